use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::{admins, employee_roles, employees, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub mobile_number: String,
    pub password_hash: String,
    pub image_url: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub mobile_number: String,
    pub password_hash: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Admin {
    pub email: String,
    pub mobile_number: String,
    pub password_hash: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = employee_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeeRole {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub employee_role_id: Uuid,
    pub image_url: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = employees)]
pub struct NewEmployee {
    pub id: Uuid,
    pub name: String,
    pub employee_role_id: Uuid,
    pub image_url: Option<String>,
    pub password_hash: String,
}
