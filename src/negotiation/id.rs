use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> $name {
                $name(raw.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> $name {
                $name(String::from(raw))
            }
        }
    };
}

opaque_id!(JobId);
opaque_id!(ProposalId);
opaque_id!(PollId);
opaque_id!(OptionId);
opaque_id!(ProfileId);
