use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::{Role, User};

pub const STAFF: &[Role] = &[Role::Employee, Role::Admin];
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// True when the caller owns the resource or holds one of `allowed_roles`.
pub fn can_act(caller: &User, resource_owner: Option<Uuid>, allowed_roles: &[Role]) -> bool {
    resource_owner == Some(caller.id) || allowed_roles.contains(&caller.role)
}

pub fn require(
    caller: &User,
    resource_owner: Option<Uuid>,
    allowed_roles: &[Role],
) -> Result<(), AppError> {
    if can_act(caller, resource_owner, allowed_roles) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}

pub fn require_role(caller: &User, allowed_roles: &[Role]) -> Result<(), AppError> {
    require(caller, None, allowed_roles)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{can_act, require_role, ADMIN_ONLY, STAFF};
    use crate::models::user::{Role, User};

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            external_id: "uid".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            phone: None,
            company: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_may_act_without_a_listed_role() {
        let customer = user(Role::Customer);
        assert!(can_act(&customer, Some(customer.id), STAFF));
        assert!(!can_act(&customer, Some(Uuid::new_v4()), STAFF));
        assert!(!can_act(&customer, None, STAFF));
    }

    #[test]
    fn staff_may_act_on_anything() {
        for role in [Role::Employee, Role::Admin] {
            assert!(can_act(&user(role), Some(Uuid::new_v4()), STAFF));
        }
        assert!(!can_act(&user(Role::DeliveryPartner), Some(Uuid::new_v4()), STAFF));
    }

    #[test]
    fn admin_only_excludes_employees() {
        assert!(require_role(&user(Role::Admin), ADMIN_ONLY).is_ok());
        let err = require_role(&user(Role::Employee), ADMIN_ONLY).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
