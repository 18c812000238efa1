//! Identifiers for participants and lending records
//!
//! Participant ids come from the external identity registry. Request and loan
//! ids are minted by an [`IdGenerator`](crate::IdGenerator).

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Borrower identity as issued by the participant registry
    BorrowerId
);
string_id!(
    /// Lender identity as issued by the participant registry
    LenderId
);
string_id!(
    /// Identifier of a [`BorrowerRequest`](crate::BorrowerRequest)
    RequestId
);
string_id!(
    /// Identifier of a [`Loan`](crate::Loan)
    LoanId
);
