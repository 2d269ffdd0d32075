//! Scope values and the resolvers that turn them into scope identities.
//!
//! A scope partitions one account definition into many independent
//! accounts, e.g. one "wallet" per user. The registry never looks inside a
//! host entity: it only asks the entity for its primary id, through a
//! [`ScopeIdentifier`] attached to the account definition.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::domain::ScopeKey;

use super::AccountError;

mod sealed {
    use std::any::{Any, TypeId};

    /// Concrete type of an entity behind `dyn ScopeEntity`. Implemented for
    /// every sized type, so implementors cannot override it.
    pub trait EntityType {
        fn concrete_type_id(&self) -> TypeId;
    }

    impl<T: Any> EntityType for T {
        fn concrete_type_id(&self) -> TypeId {
            TypeId::of::<T>()
        }
    }
}

/// A host-application record that can scope an account (a user, an
/// organization, ...).
pub trait ScopeEntity: sealed::EntityType + fmt::Debug + Send + Sync + 'static {
    /// Stable primary id for the lifetime of the entity.
    fn primary_id(&self) -> ScopeKey;

    /// Name used in mismatch errors.
    fn entity_name(&self) -> &'static str {
        short_type_name::<Self>()
    }
}

fn is_entity_of<T: ScopeEntity>(entity: &dyn ScopeEntity) -> bool {
    <dyn ScopeEntity as sealed::EntityType>::concrete_type_id(entity) == TypeId::of::<T>()
}

/// The shapes a caller may pass as a scope.
///
/// `Float` and `Bool` are accepted as values but no built-in resolver
/// maps them to an identity; they exist so callers get a typed
/// `AccountScopeMismatch` rather than a conversion failure upstream.
#[derive(Debug, Clone)]
pub enum Scope {
    Entity(Arc<dyn ScopeEntity>),
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scope {
    pub fn entity(entity: impl ScopeEntity) -> Self {
        Self::Entity(Arc::new(entity))
    }

    /// Whether the value selects a scoped account.
    ///
    /// Blank text and `false` count as no scope at all.
    pub fn is_present(&self) -> bool {
        match self {
            Scope::Text(value) => !value.trim().is_empty(),
            Scope::Bool(value) => *value,
            Scope::Entity(_) | Scope::Integer(_) | Scope::Float(_) => true,
        }
    }

    /// Name of the value's shape, as reported in mismatch errors.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Scope::Entity(entity) => entity.entity_name(),
            Scope::Text(_) => "String",
            Scope::Integer(_) => "Integer",
            Scope::Float(_) => "Float",
            Scope::Bool(_) => "Bool",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Entity(entity) => write!(f, "{}({})", entity.entity_name(), entity.primary_id()),
            Scope::Text(value) => write!(f, "{value}"),
            Scope::Integer(value) => write!(f, "{value}"),
            Scope::Float(value) => write!(f, "{value}"),
            Scope::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scope {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Scope {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scope {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

type ResolveFn = dyn Fn(&Scope) -> Result<ScopeKey, AccountError> + Send + Sync;

/// Resolver from a scope value to its raw identity.
///
/// Must be pure: the same scope always resolves to the same key.
#[derive(Clone)]
pub struct ScopeIdentifier {
    kind: String,
    resolve: Arc<ResolveFn>,
}

impl ScopeIdentifier {
    /// Wrap a caller-supplied resolver. `kind` names the expected scope shape.
    pub fn from_fn<F>(kind: impl Into<String>, resolve: F) -> Self
    where
        F: Fn(&Scope) -> Result<ScopeKey, AccountError> + Send + Sync + 'static,
    {
        Self {
            kind: kind.into(),
            resolve: Arc::new(resolve),
        }
    }

    /// Resolver for accounts scoped by entity type `T`.
    ///
    /// Accepts, in order: an instance of `T` (its primary id), a raw text or
    /// integer id (unchanged). Anything else is a scope mismatch.
    pub fn entity<T: ScopeEntity>() -> Self {
        let kind = short_type_name::<T>();
        Self::from_fn(kind, move |scope| match scope {
            Scope::Entity(entity) if is_entity_of::<T>(entity.as_ref()) => {
                Ok(entity.primary_id())
            }
            Scope::Text(id) => Ok(ScopeKey::Text(id.clone())),
            Scope::Integer(id) => Ok(ScopeKey::Integer(*id)),
            other => Err(mismatch(kind, other.shape_name())),
        })
    }

    /// Resolver that only takes raw text or integer ids.
    ///
    /// For charts declared outside the host application, where no entity
    /// type is available.
    pub fn raw(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        let expected = kind.clone();
        Self::from_fn(kind, move |scope| match scope {
            Scope::Text(id) => Ok(ScopeKey::Text(id.clone())),
            Scope::Integer(id) => Ok(ScopeKey::Integer(*id)),
            other => Err(mismatch(&expected, other.shape_name())),
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn resolve(&self, scope: &Scope) -> Result<ScopeKey, AccountError> {
        (self.resolve)(scope)
    }
}

impl fmt::Debug for ScopeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeIdentifier")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

pub(crate) fn mismatch(expected: &str, received: &str) -> AccountError {
    AccountError::AccountScopeMismatch {
        expected: expected.to_string(),
        received: received.to_string(),
    }
}

/// Last path segment of a type name: `app::models::User` -> `User`.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct User {
        id: i64,
    }

    impl ScopeEntity for User {
        fn primary_id(&self) -> ScopeKey {
            ScopeKey::Integer(self.id)
        }
    }

    #[derive(Debug)]
    struct Organization {
        slug: String,
    }

    impl ScopeEntity for Organization {
        fn primary_id(&self) -> ScopeKey {
            ScopeKey::Text(self.slug.clone())
        }
    }

    #[test]
    fn test_entity_name_is_short_type_name() {
        assert_eq!(User { id: 1 }.entity_name(), "User");
        assert_eq!(ScopeIdentifier::entity::<User>().kind(), "User");
    }

    #[test]
    fn test_entity_resolver_projects_primary_id() {
        let resolver = ScopeIdentifier::entity::<User>();
        let key = resolver.resolve(&Scope::entity(User { id: 42 })).unwrap();
        assert_eq!(key, ScopeKey::Integer(42));
    }

    #[test]
    fn test_entity_resolver_passes_raw_ids_through() {
        let resolver = ScopeIdentifier::entity::<User>();
        assert_eq!(resolver.resolve(&Scope::from(7)).unwrap(), ScopeKey::Integer(7));
        assert_eq!(
            resolver.resolve(&Scope::from("u-7")).unwrap(),
            ScopeKey::Text("u-7".into())
        );
    }

    #[test]
    fn test_entity_resolver_rejects_other_entity() {
        let resolver = ScopeIdentifier::entity::<User>();
        let err = resolver
            .resolve(&Scope::entity(Organization { slug: "acme".into() }))
            .unwrap_err();
        assert_eq!(
            err,
            AccountError::AccountScopeMismatch {
                expected: "User".into(),
                received: "Organization".into(),
            }
        );
    }

    #[test]
    fn test_entity_resolver_rejects_float_and_bool() {
        let resolver = ScopeIdentifier::entity::<User>();
        for scope in [Scope::from(1.5), Scope::from(true)] {
            let err = resolver.resolve(&scope).unwrap_err();
            assert!(
                matches!(err, AccountError::AccountScopeMismatch { ref received, .. } if received == scope.shape_name()),
                "unexpected error: {err:?}"
            );
        }
    }

    /// Borrows `User`'s name but is a different type.
    #[derive(Debug)]
    struct Lookalike;

    impl ScopeEntity for Lookalike {
        fn primary_id(&self) -> ScopeKey {
            ScopeKey::Integer(1)
        }

        fn entity_name(&self) -> &'static str {
            "User"
        }
    }

    #[test]
    fn test_entity_resolver_matches_on_concrete_type_not_name() {
        let resolver = ScopeIdentifier::entity::<User>();
        let err = resolver.resolve(&Scope::entity(Lookalike)).unwrap_err();
        assert!(matches!(err, AccountError::AccountScopeMismatch { .. }));
    }

    #[test]
    fn test_is_present() {
        assert!(Scope::from("u-1").is_present());
        assert!(Scope::from(0).is_present());
        assert!(Scope::from(0.0).is_present());
        assert!(Scope::from(true).is_present());
        assert!(Scope::entity(User { id: 1 }).is_present());

        assert!(!Scope::from("").is_present());
        assert!(!Scope::from("  ").is_present());
        assert!(!Scope::from(false).is_present());
    }

    #[test]
    fn test_entity_resolver_is_deterministic() {
        let resolver = ScopeIdentifier::entity::<Organization>();
        let scope = Scope::entity(Organization { slug: "acme".into() });
        assert_eq!(resolver.resolve(&scope).unwrap(), resolver.resolve(&scope).unwrap());
    }

    #[test]
    fn test_raw_resolver_rejects_entities() {
        let resolver = ScopeIdentifier::raw("customer");
        assert!(resolver.resolve(&Scope::from("c-1")).is_ok());
        let err = resolver.resolve(&Scope::entity(User { id: 1 })).unwrap_err();
        assert_eq!(
            err,
            AccountError::AccountScopeMismatch {
                expected: "customer".into(),
                received: "User".into(),
            }
        );
    }

    #[test]
    fn test_custom_resolver() {
        let resolver = ScopeIdentifier::from_fn("region", |scope| match scope {
            Scope::Text(code) => Ok(ScopeKey::Text(code.to_uppercase())),
            other => Err(mismatch("region", other.shape_name())),
        });
        assert_eq!(
            resolver.resolve(&Scope::from("emea")).unwrap(),
            ScopeKey::Text("EMEA".into())
        );
        assert!(resolver.resolve(&Scope::from(3)).is_err());
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::entity(User { id: 3 }).to_string(), "User(3)");
        assert_eq!(Scope::from("abc").to_string(), "abc");
        assert_eq!(Scope::from(12).to_string(), "12");
    }
}
