use sea_orm::entity::prelude::*;

/// Audit record of an approval workflow item. `target_id` points at a
/// course, a school, or the account itself depending on `kind`.
/// Invariant: reviewer fields are NULL iff status is pending.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "approval_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: i16,
    pub subject_id: Uuid,
    pub target_id: Uuid,
    pub status: i16,
    pub requested_at: chrono::DateTime<chrono::Utc>,
    pub reviewer_id: Option<Uuid>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
