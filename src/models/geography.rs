use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::{cities, districts, locations, provinces};

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = provinces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Province {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = districts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct District {
    pub id: Uuid,
    pub name: String,
    pub province_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct City {
    pub id: Uuid,
    pub name: String,
    pub district_id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Location {
    pub id: Uuid,
    pub state: String,
    pub city_id: Uuid,
    pub postal_code: String,
    pub user_email: String,
}
