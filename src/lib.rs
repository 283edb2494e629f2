use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

pub use accum::Accumulator;
pub use bench::{DivergencePolicy, Harness};
pub use lexer::{InvokeError, Lex, Lexer};
pub use prepare::{Prepared, Preprocessor};
pub use report::{Cell, Report};

mod accum;
mod bench;
pub mod corpus;
pub mod diff;
mod lexer;
mod prepare;
mod report;

pub type TokenStream = Vec<String>;
pub type Stdout = Rc<RefCell<dyn Write>>;
