//! Account registration.

use chrono::Utc;
use uuid::Uuid;

use rollcall_domain::approval::{ApprovalKind, ApprovalStatus};

use crate::domain::repository::AccountRepository;
use crate::domain::types::{Account, ApprovalRequest, validate_email};
use crate::error::AttendanceServiceError;

pub struct RegisterAccountInput {
    pub name: String,
    pub email: String,
}

pub struct RegisterAccountUseCase<A>
where
    A: AccountRepository,
{
    pub accounts: A,
}

impl<A> RegisterAccountUseCase<A>
where
    A: AccountRepository,
{
    /// Create an inactive account together with its pending activation
    /// request, in one transaction. The account becomes usable only once an
    /// admin approves the request.
    pub async fn execute(
        &self,
        input: RegisterAccountInput,
    ) -> Result<Account, AttendanceServiceError> {
        if !validate_email(&input.email) {
            return Err(AttendanceServiceError::InvalidEmail);
        }
        if self.accounts.find_by_email(&input.email).await?.is_some() {
            return Err(AttendanceServiceError::EmailTaken);
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            active: false,
            created_at: now,
        };
        let request = ApprovalRequest {
            id: Uuid::new_v4(),
            kind: ApprovalKind::Activation,
            subject_id: account.id,
            target_id: account.id,
            status: ApprovalStatus::Pending,
            requested_at: now,
            reviewer_id: None,
            reviewed_at: None,
            notes: None,
        };

        self.accounts.create_with_request(&account, &request).await?;
        Ok(account)
    }
}
