//! Documentation content for the esl CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Sections,
    Expressions,
    Literals,
    Comments,
    Search,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" => Some(Self::Syntax),
            "sections" | "section" | "groups" => Some(Self::Sections),
            "expressions" | "expression" | "expr" => Some(Self::Expressions),
            "literals" | "literal" | "strings" => Some(Self::Literals),
            "comments" | "comment" => Some(Self::Comments),
            "search" | "paging" => Some(Self::Search),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"ESL DOCUMENTATION

ESL is a small filter language compiled into search-backend filters. A query
is a set of sections holding membership and range tests on document fields.

DOCUMENTATION CATEGORIES

  syntax            Overall grammar and how pieces combine
  sections          { } blocks, nesting, and the 'or' between sections
  expressions       in / not in, sets and ranges
  literals          Quoted names and values, '+' concatenation
  comments          /* ... */ comments
  search            How results are collected from the backend

QUICK REFERENCE

  { A; B }            A and B
  { A or B }          A or B
  { ... } { ... }     both sections
  { ... } or { ... }  either section
  'f' in ('x', 'y')   f is x or y
  'f' not in ('x')    f is not x
  'f' in ['1':'9']    1 <= f <= 9
  'f' in ['1':]       f >= 1

Run 'esl doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_str(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Sections) => Ok(SECTIONS_DOC),
        Some(DocCategory::Expressions) => Ok(EXPRESSIONS_DOC),
        Some(DocCategory::Literals) => Ok(LITERALS_DOC),
        Some(DocCategory::Comments) => Ok(COMMENTS_DOC),
        Some(DocCategory::Search) => Ok(SEARCH_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Grammar Overview

  Query        := Section+
  Section      := '{' Body '}' ( 'or' '{' Body '}' )*
  Body         := Section+  |  CondList
  CondList     := Cond ( ';' Cond )*
  Cond         := Expr ( 'or' Expr )*
  Expr         := Id ( 'not' )? 'in' Container
  Container    := '(' Id ( ',' Id )* ')'  |  '[' Id? ':' Id? ']'
  Id           := 'literal' ( '+' Id )?

COMBINING
  ;                 and, between conditions
  or                or, between expressions or between sections
  adjacent { }      and, between sections

  A group with a single member compiles to that member alone.

Examples:
  { 'status' in ('active') }
  { 'status' in ('active'); 'age' in ['18':] }
  { 'role' in ('admin') or 'role' in ('owner') }
  { 'a' in ('1') } or { 'b' in ('2') }
"#;

const SECTIONS_DOC: &str = r#"SECTIONS - Blocks and Nesting

A section is a { } block. It holds either conditions or further sections;
the first token after '{' decides which.

  { 'a' in ('1'); 'b' in ('2') }          conditions
  { { 'a' in ('1') } or { 'b' in ('2') } } nested sections

Sections written next to each other are ANDed:
  { 'a' in ('1') } { 'b' in ('2') }       a = 1 and b = 2

Sections joined with 'or' are ORed:
  { 'a' in ('1') } or { 'b' in ('2') }    a = 1 or b = 2

An empty section {} adds nothing and ends an 'or' chain. A query made only
of empty sections is an error.

A trailing ';' before '}' is accepted.
"#;

const EXPRESSIONS_DOC: &str = r#"EXPRESSIONS - Membership and Ranges

SETS
  'field' in ('a', 'b')       field is a or b
  'field' not in ('a')        field is not a

  A set must hold at least one value. Duplicates are ignored.

RANGES
  'field' in ['10':'20']      10 <= field <= 20
  'field' in ['10':]          field >= 10
  'field' in [:'20']          field <= 20
  'field' not in ['10':'20']  field outside 10..20

  At least one bound is required; ['':''] and [:] are errors.
  Bounds are compared by the backend, as strings or numbers depending on
  the field mapping.
"#;

const LITERALS_DOC: &str = r#"LITERALS - Names and Values

Every field name and value is quoted, with either ' or ". The closing quote
must match the opening one. There are no escapes: a literal ends at the
first matching quote.

  'name'    "name"    'say "hi"'    "it's"

CONCATENATION
  '+' joins literals:
    'user' + '_id' in ('4' + '2')     same as 'user_id' in ('42')

  A '+' without a literal on both sides is an error.

KEYWORDS
  or, not, in are the only bare words. Anything else unquoted is an error.
"#;

const COMMENTS_DOC: &str = r#"COMMENTS

  /* anything here is ignored */

Comments may span lines and appear between any two tokens. They do not
nest: the first */ closes the comment. A comment left open is an error.

Example:
  { 'a' in ('1') /* legacy */ ; 'b' in ('2') }
"#;

const SEARCH_DOC: &str = r#"SEARCH - Collecting Results

  esl search --index logs --app-key KEY "{ 'level' in ('error') }"

The query is compiled first; nothing is sent to the backend if it does not
compile. Documents must also match the app key, as a term filter on the
configured app key field (default: appkey).

With --system-condition, the condition becomes an extra section ANDed with
the whole query:
  {QUERY} {CONDITION}

Results are read page by page through a scroll cursor until every reported
hit is collected or a page comes back empty. Any backend error fails the
whole search; partial results are never printed.

Output is a JSON object of document id -> payload. With --field, the
payload holds those fields only; otherwise it is the stored document. A
document with no payload maps to null.
"#;
