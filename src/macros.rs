/// Создаёт новый тип идентификатора сущности каталога.
#[macro_export]
macro_rules! id_newtype {
    ($tname:ident) => {
        #[derive(
            std::fmt::Debug,
            std::clone::Clone,
            std::marker::Copy,
            serde::Serialize,
            serde::Deserialize,
            std::cmp::PartialEq,
            std::cmp::Eq,
            std::hash::Hash,
            std::default::Default,
        )]
        #[serde(transparent)]
        pub struct $tname(u64);

        impl $tname {
            pub fn new(value: u64) -> Self {
                Self(value)
            }
        }

        impl std::convert::From<u64> for $tname {
            fn from(value: u64) -> Self {
                $tname::new(value)
            }
        }

        impl std::fmt::Display for $tname {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $tname {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($tname::new(u64::from_str(s)?))
            }
        }
    };
}
