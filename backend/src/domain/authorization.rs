//! Tenant-scoped role-based authorization.
//!
//! Policy rules live in the store as `p` rows (a role may perform an action on
//! an object in a tenant, or in every tenant via [`GLOBAL_TENANT`]) and `g`
//! rows (a user holds a role in a tenant). [`PolicyCache`] keeps an immutable
//! [`PolicySet`] snapshot in memory and swaps in a complete replacement on
//! [`PolicyCache::reload`], so a concurrent reader sees either the old set or
//! the new one and never a mixture.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::ports::{AuthorizationOracle, PolicyRepository};
use super::{Error, TenantId, UserId};

/// Tenant marker for permissions that apply to every tenant.
pub const GLOBAL_TENANT: &str = "*";

/// Role granted to a user when they are assigned as a requisition's recruiter.
pub const RECRUITER_ROLE: &str = "RECRUITER";

/// The authenticated user and the tenant they act in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub tenant_id: TenantId,
}

impl Actor {
    #[must_use]
    pub const fn new(user_id: UserId, tenant_id: TenantId) -> Self {
        Self { user_id, tenant_id }
    }
}

/// An `(object, action)` pair checked against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission {
    pub object: &'static str,
    pub action: &'static str,
}

impl Permission {
    pub const CREATE_REQUISITION: Self = Self::new("job_requisition", "create");
    pub const READ_REQUISITIONS: Self = Self::new("job_requisition", "read");
    pub const SUPERVISE_REQUISITION: Self = Self::new("job_requisition", "supervise");
    pub const APPROVE_REQUISITION: Self = Self::new("job_requisition", "approve");
    pub const READ_APPLICATIONS: Self = Self::new("job_application", "read");
    pub const SCREEN_APPLICATION: Self = Self::new("job_application", "screen");
    pub const OFFER_APPLICATION: Self = Self::new("job_application", "offer");
    pub const MANAGE_ORGANISATION: Self = Self::new("organisation", "manage");
    pub const READ_ORGANISATION: Self = Self::new("organisation", "read");
    pub const MANAGE_POLICY: Self = Self::new("policy", "manage");

    #[must_use]
    pub const fn new(object: &'static str, action: &'static str) -> Self {
        Self { object, action }
    }
}

/// One stored policy row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PolicyRule {
    /// `role` may perform `action` on `object` within `tenant`.
    Permission {
        role: String,
        tenant: String,
        object: String,
        action: String,
    },
    /// `user` holds `role` within `tenant`.
    Grant {
        user: String,
        role: String,
        tenant: String,
    },
}

impl PolicyRule {
    /// Grant `role` to `user` in `tenant`.
    pub fn grant(user: UserId, role: impl Into<String>, tenant: TenantId) -> Self {
        Self::Grant {
            user: user.to_string(),
            role: role.into(),
            tenant: tenant.to_string(),
        }
    }

    /// Allow `role` to perform `action` on `object` in `tenant`.
    pub fn permission(
        role: impl Into<String>,
        tenant: TenantId,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::Permission {
            role: role.into(),
            tenant: tenant.to_string(),
            object: object.into(),
            action: action.into(),
        }
    }
}

type GrantKey = (String, String);
type PermissionKey = (String, String, String);

/// Immutable snapshot of every policy rule.
#[derive(Debug, Default)]
pub struct PolicySet {
    roles_by_user: HashMap<GrantKey, HashSet<String>>,
    permissions_by_role: HashMap<String, HashSet<PermissionKey>>,
}

impl PolicySet {
    /// Index a full rule listing.
    pub fn from_rules(rules: impl IntoIterator<Item = PolicyRule>) -> Self {
        let mut set = Self::default();
        for rule in rules {
            match rule {
                PolicyRule::Permission {
                    role,
                    tenant,
                    object,
                    action,
                } => {
                    set.permissions_by_role
                        .entry(role)
                        .or_default()
                        .insert((tenant, object, action));
                }
                PolicyRule::Grant { user, role, tenant } => {
                    set.roles_by_user
                        .entry((user, tenant))
                        .or_default()
                        .insert(role);
                }
            }
        }
        set
    }

    /// Roles held by the actor in their own tenant.
    pub fn roles_of(&self, actor: &Actor) -> impl Iterator<Item = &str> {
        self.roles_by_user
            .get(&(actor.user_id.to_string(), actor.tenant_id.to_string()))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Whether any of the actor's roles permits `permission` in the actor's
    /// tenant or globally.
    #[must_use]
    pub fn allows(&self, actor: &Actor, permission: Permission) -> bool {
        let tenant = actor.tenant_id.to_string();
        self.roles_of(actor).any(|role| {
            self.permissions_by_role.get(role).is_some_and(|grants| {
                grants.iter().any(|(granted_tenant, object, action)| {
                    (granted_tenant == &tenant || granted_tenant == GLOBAL_TENANT)
                        && object == permission.object
                        && action == permission.action
                })
            })
        })
    }
}

/// Shared, reloadable policy snapshot.
///
/// Cloning is cheap: clones share the same snapshot slot.
#[derive(Clone)]
pub struct PolicyCache {
    repository: Arc<dyn PolicyRepository>,
    current: Arc<RwLock<Arc<PolicySet>>>,
    reloading: Arc<Mutex<()>>,
}

impl PolicyCache {
    /// Create an empty cache; call [`Self::reload`] before serving requests.
    pub fn new(repository: Arc<dyn PolicyRepository>) -> Self {
        Self {
            repository,
            current: Arc::new(RwLock::new(Arc::new(PolicySet::default()))),
            reloading: Arc::new(Mutex::new(())),
        }
    }

    /// Current snapshot. Holding it does not block reloads.
    pub async fn snapshot(&self) -> Arc<PolicySet> {
        Arc::clone(&*self.current.read().await)
    }

    /// Load every rule from the store and swap the snapshot.
    ///
    /// Reloads are serialized, so a slow read of older rules can never land
    /// after a newer one. Readers are only blocked for the pointer swap.
    pub async fn reload(&self) -> Result<(), Error> {
        let _reloading = self.reloading.lock().await;
        let rules = self.repository.load_rules().await?;
        let count = rules.len();
        let fresh = Arc::new(PolicySet::from_rules(rules));
        *self.current.write().await = fresh;
        info!(rules = count, "authorization policy reloaded");
        Ok(())
    }
}

#[async_trait]
impl AuthorizationOracle for PolicyCache {
    async fn authorize(&self, actor: &Actor, permission: Permission) -> Result<(), Error> {
        if self.snapshot().await.allows(actor, permission) {
            return Ok(());
        }
        debug!(
            user_id = %actor.user_id,
            tenant_id = %actor.tenant_id,
            object = permission.object,
            action = permission.action,
            "authorization denied"
        );
        Err(Error::unauthorized(format!(
            "not permitted to {} {}",
            permission.action, permission.object
        )))
    }

    async fn reload(&self) -> Result<(), Error> {
        PolicyCache::reload(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockPolicyRepository;
    use rstest::{fixture, rstest};

    #[fixture]
    fn actor() -> Actor {
        Actor::new(UserId::random(), TenantId::random())
    }

    fn global_permission(role: &str, permission: Permission) -> PolicyRule {
        PolicyRule::Permission {
            role: role.to_owned(),
            tenant: GLOBAL_TENANT.to_owned(),
            object: permission.object.to_owned(),
            action: permission.action.to_owned(),
        }
    }

    #[rstest]
    fn global_permission_applies_to_granted_tenant(actor: Actor) {
        let set = PolicySet::from_rules([
            global_permission("SUPERVISOR", Permission::SUPERVISE_REQUISITION),
            PolicyRule::grant(actor.user_id, "SUPERVISOR", actor.tenant_id),
        ]);
        assert!(set.allows(&actor, Permission::SUPERVISE_REQUISITION));
        assert!(!set.allows(&actor, Permission::APPROVE_REQUISITION));
    }

    #[rstest]
    fn grant_in_another_tenant_does_not_apply(actor: Actor) {
        let set = PolicySet::from_rules([
            global_permission("SUPERVISOR", Permission::SUPERVISE_REQUISITION),
            PolicyRule::grant(actor.user_id, "SUPERVISOR", TenantId::random()),
        ]);
        assert!(!set.allows(&actor, Permission::SUPERVISE_REQUISITION));
    }

    #[rstest]
    fn tenant_permission_does_not_leak_to_other_tenants(actor: Actor) {
        let other_tenant = TenantId::random();
        let set = PolicySet::from_rules([
            PolicyRule::permission("AUDITOR", other_tenant, "job_application", "read"),
            PolicyRule::grant(actor.user_id, "AUDITOR", actor.tenant_id),
        ]);
        assert!(!set.allows(&actor, Permission::READ_APPLICATIONS));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_cache_denies_everything(actor: Actor) {
        let cache = PolicyCache::new(Arc::new(MockPolicyRepository::new()));
        let err = cache
            .authorize(&actor, Permission::READ_REQUISITIONS)
            .await
            .expect_err("denied");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn reload_swaps_in_stored_rules(actor: Actor) {
        let mut repository = MockPolicyRepository::new();
        let rules = vec![
            global_permission("RECRUITER", Permission::SCREEN_APPLICATION),
            PolicyRule::grant(actor.user_id, RECRUITER_ROLE, actor.tenant_id),
        ];
        repository
            .expect_load_rules()
            .times(1)
            .returning(move || Ok(rules.clone()));
        let cache = PolicyCache::new(Arc::new(repository));

        let before = cache.snapshot().await;
        cache.reload().await.expect("reload");

        assert!(!before.allows(&actor, Permission::SCREEN_APPLICATION));
        assert!(
            cache
                .authorize(&actor, Permission::SCREEN_APPLICATION)
                .await
                .is_ok()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn failed_reload_keeps_previous_snapshot(actor: Actor) {
        let mut repository = MockPolicyRepository::new();
        let mut calls = 0;
        let user = actor.user_id;
        let tenant = actor.tenant_id;
        repository.expect_load_rules().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![
                    global_permission("HR_APPROVER", Permission::APPROVE_REQUISITION),
                    PolicyRule::grant(user, "HR_APPROVER", tenant),
                ])
            } else {
                Err(Error::internal("store unavailable"))
            }
        });
        let cache = PolicyCache::new(Arc::new(repository));

        cache.reload().await.expect("first reload");
        assert!(cache.reload().await.is_err());
        assert!(
            cache
                .snapshot()
                .await
                .allows(&actor, Permission::APPROVE_REQUISITION)
        );
    }

    /// Serves stale rules on the first load, parked until released, and the
    /// fresh rules on every later load.
    struct GatedRepository {
        calls: std::sync::atomic::AtomicUsize,
        started: tokio::sync::Notify,
        release: tokio::sync::Notify,
        fresh: Vec<PolicyRule>,
    }

    #[async_trait]
    impl PolicyRepository for GatedRepository {
        async fn load_rules(&self) -> Result<Vec<PolicyRule>, Error> {
            let call = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call == 0 {
                self.started.notify_one();
                self.release.notified().await;
                return Ok(Vec::new());
            }
            Ok(self.fresh.clone())
        }

        async fn insert_rule(&self, _rule: &PolicyRule) -> Result<(), Error> {
            Ok(())
        }
    }

    #[rstest]
    #[tokio::test]
    async fn overlapping_reloads_keep_the_newest_rules(actor: Actor) {
        let repository = Arc::new(GatedRepository {
            calls: std::sync::atomic::AtomicUsize::new(0),
            started: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
            fresh: vec![
                global_permission(RECRUITER_ROLE, Permission::SCREEN_APPLICATION),
                PolicyRule::grant(actor.user_id, RECRUITER_ROLE, actor.tenant_id),
            ],
        });
        let cache = PolicyCache::new(repository.clone());

        let slow = tokio::spawn({
            let cache = cache.clone();
            async move { cache.reload().await }
        });
        repository.started.notified().await;
        let fast = tokio::spawn({
            let cache = cache.clone();
            async move { cache.reload().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        repository.release.notify_one();

        slow.await.expect("slow task").expect("slow reload");
        fast.await.expect("fast task").expect("fast reload");

        assert!(
            cache
                .authorize(&actor, Permission::SCREEN_APPLICATION)
                .await
                .is_ok()
        );
    }
}
