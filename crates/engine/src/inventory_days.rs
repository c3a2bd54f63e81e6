//! Physical stock for one day, counted in bags.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, recompute::InventoryFigures, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDay {
    pub id: Uuid,
    pub day_id: Uuid,
    /// Copied from the prior day's confirmed closing when the row is created
    /// and never recomputed afterwards.
    pub opening_bags: i64,
    pub produced_bags: i64,
    pub spoilage_bags: i64,
    pub outgoing_driver_loads_bags: i64,
    pub outgoing_office_sales_bags: i64,
    pub closing_bags_computed: i64,
    pub closing_bags_confirmed: Option<i64>,
    pub variance_bags: i64,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryDay {
    pub fn new(day_id: Uuid, opening_bags: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            day_id,
            opening_bags,
            produced_bags: 0,
            spoilage_bags: 0,
            outgoing_driver_loads_bags: 0,
            outgoing_office_sales_bags: 0,
            closing_bags_computed: opening_bags,
            closing_bags_confirmed: None,
            variance_bags: 0,
            notes: None,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, figures: &InventoryFigures) {
        self.outgoing_driver_loads_bags = figures.outgoing_driver_loads_bags;
        self.outgoing_office_sales_bags = figures.outgoing_office_sales_bags;
        self.closing_bags_computed = figures.closing_bags_computed;
        self.variance_bags = figures.variance_bags;
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inventory_days")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub day_id: String,
    pub opening_bags: i64,
    pub produced_bags: i64,
    pub spoilage_bags: i64,
    pub outgoing_driver_loads_bags: i64,
    pub outgoing_office_sales_bags: i64,
    pub closing_bags_computed: i64,
    pub closing_bags_confirmed: Option<i64>,
    pub variance_bags: i64,
    pub notes: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::days::Entity",
        from = "Column::DayId",
        to = "super::days::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Days,
}

impl Related<super::days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Days.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&InventoryDay> for ActiveModel {
    fn from(value: &InventoryDay) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            day_id: ActiveValue::Set(value.day_id.to_string()),
            opening_bags: ActiveValue::Set(value.opening_bags),
            produced_bags: ActiveValue::Set(value.produced_bags),
            spoilage_bags: ActiveValue::Set(value.spoilage_bags),
            outgoing_driver_loads_bags: ActiveValue::Set(value.outgoing_driver_loads_bags),
            outgoing_office_sales_bags: ActiveValue::Set(value.outgoing_office_sales_bags),
            closing_bags_computed: ActiveValue::Set(value.closing_bags_computed),
            closing_bags_confirmed: ActiveValue::Set(value.closing_bags_confirmed),
            variance_bags: ActiveValue::Set(value.variance_bags),
            notes: ActiveValue::Set(value.notes.clone()),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for InventoryDay {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "inventory day")?,
            day_id: parse_uuid(&model.day_id, "day")?,
            opening_bags: model.opening_bags,
            produced_bags: model.produced_bags,
            spoilage_bags: model.spoilage_bags,
            outgoing_driver_loads_bags: model.outgoing_driver_loads_bags,
            outgoing_office_sales_bags: model.outgoing_office_sales_bags,
            closing_bags_computed: model.closing_bags_computed,
            closing_bags_confirmed: model.closing_bags_confirmed,
            variance_bags: model.variance_bags,
            notes: model.notes,
            updated_at: model.updated_at,
        })
    }
}
