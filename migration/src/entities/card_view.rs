use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "card_views")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub card_id: String,
    pub viewer_ip: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub viewer_user_agent: Option<String>,
    pub viewer_location: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub referrer: Option<String>,
    pub viewed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
