pub mod ast;
pub mod backend;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod request;
pub mod service;
pub mod value;

pub use ast::{BoolOp, Bounds, Filter, Token, TokenKind};
pub use backend::{BackendError, ElasticBackend, Hit, Page, PageRequest, SearchBackend};
pub use compiler::{CompileError, compile};
pub use config::{ConfigError, ServiceConfig};
pub use error::SearchError;
pub use executor::{CancelFlag, ExecError, Executor, execute};
pub use lexer::{LexError, Lexer, Position, tokenize};
pub use output::to_json;
pub use parser::{ParseError, Parser};
pub use request::{SearchReply, SearchSpec};
pub use service::SearchService;
pub use value::{Payload, ResultSet};
