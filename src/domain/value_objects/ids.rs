use uuid::Uuid;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        pub struct $name(pub u128);

        impl $name {
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4().as_u128())
            }

            #[inline]
            pub fn as_uuid(&self) -> Uuid {
                Uuid::from_u128(self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value.as_u128())
            }
        }
    };
}

id_type!(ProjectId);

/// Identity of an account owner, as issued by the identity provider.
///
/// Opaque to this service: it is trusted as-is once the session layer produced it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
