/// AST (Abstract Syntax Tree) module
/// Contains the node contract the grammar engine builds against, and the
/// node shapes of the sample language.
///
/// Submodules:
/// - ast: Node trait, captured values and the tag to constructor lookup
/// - expressions: Literal and operator nodes
/// - statements: Statement nodes
pub mod ast;
pub mod expressions;
pub mod statements;
