//! # ESL - Syntax Tree
//!
//! Types shared by the lexer, the parser and the query executor.
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Boolean composition operators
//! - **[filter]** - The compiled filter tree
//!
//! ## Quick Start
//!
//! ```text
//! { 'status' in ('active'); 'age' in ['18':] }
//! ```
//!
//! compiles to
//!
//! ```text
//! AND( status ∈ {active}, age ≥ 18 )
//! ```
//!
//! ## Core Concepts
//!
//! ### Sections
//!
//! A query is one or more `{ ... }` sections. Adjacent sections are ANDed,
//! sections joined by `or` are ORed, and a section may contain nested
//! sections instead of conditions.
//!
//! ### Conditions
//!
//! Inside a section, conditions are separated by `;` (AND) and each condition
//! is a chain of expressions joined by `or`.
//!
//! ### Expressions
//!
//! ```text
//! 'field' in ('a', 'b')       membership
//! 'field' not in ('a')        exclusion
//! 'field' in ['1':'9']        range, either bound optional
//! 'field' not in [:'9']       outside range
//! ```
//!
//! All names and values are quoted literals; `+` concatenates them.
//!
//! ### Collapse
//!
//! A group with a single member is never emitted: `{ 'a' in ('1') }` compiles
//! to the bare predicate.
pub mod filter;
pub mod operators;
pub mod tokens;

pub use filter::{Bounds, Filter};
pub use operators::BoolOp;
pub use tokens::{Token, TokenKind};
