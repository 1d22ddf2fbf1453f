use crate::Pos;

/// An error produced while parsing a query document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] async_graphql_parser::Error),
    #[error("Query is nested too deeply to be parsed")]
    RecursionLimitExceeded { pos: Pos },
}

impl Error {
    /// Source positions related to this error, in document order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let positions: Vec<Pos> = match self {
            Error::Syntax(err) => err.positions().collect(),
            Error::RecursionLimitExceeded { pos } => vec![*pos],
        };

        positions.into_iter()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
