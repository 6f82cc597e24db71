use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::{SecretHasher, TokenIssuer};
use crate::errors::AppError;
use crate::handlers::{require, require_email, with_conn, Pagination};
use crate::models::identity::{Admin, Employee, EmployeeRole, NewEmployee, NewUser, User};
use crate::schema::{admins, employee_roles, employees, users};

const MIN_PASSWORD_LEN: usize = 8;
// bcrypt ignores everything past 72 bytes.
const MAX_PASSWORD_BYTES: usize = 72;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub mobile_number: String,
    pub password: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub mobile_number: String,
    pub image_url: Option<String>,
    pub is_verified: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            gender: u.gender,
            mobile_number: u.mobile_number,
            image_url: u.image_url,
            is_verified: u.is_verified,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminRequest {
    pub email: String,
    pub mobile_number: String,
    pub password: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    pub email: String,
    pub mobile_number: String,
    pub image_url: Option<String>,
}

impl From<Admin> for AdminResponse {
    fn from(a: Admin) -> Self {
        Self {
            email: a.email,
            mobile_number: a.mobile_number,
            image_url: a.image_url,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeRequest {
    pub name: String,
    pub employee_role_id: Uuid,
    pub password: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: Uuid,
    pub name: String,
    pub employee_role_id: Uuid,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            employee_role_id: e.employee_role_id,
            image_url: e.image_url,
            is_active: e.is_active,
        }
    }
}

fn require_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(DomainError::InvalidInput(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// Runs the bcrypt work on the blocking thread pool.
async fn hash_password(
    hasher: web::Data<dyn SecretHasher>,
    password: String,
) -> Result<String, AppError> {
    let hash = web::block(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(hash)
}

// ── Users ────────────────────────────────────────────────────────────────────

/// POST /users/signup
///
/// Registers a user. Only the salted hash of the password is stored.
#[utoipa::path(
    post,
    path = "/users/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid registration"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "identity"
)]
pub async fn signup(
    pool: web::Data<DbPool>,
    hasher: web::Data<dyn SecretHasher>,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require_email("email", &body.email)?;
    require("first_name", &body.first_name)?;
    require("last_name", &body.last_name)?;
    require("mobile_number", &body.mobile_number)?;
    require_password(&body.password)?;

    let password_hash = hash_password(hasher, body.password).await?;
    let new_user = NewUser {
        password_hash,
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        gender: body.gender,
        mobile_number: body.mobile_number,
        image_url: body.image_url,
    };

    let user = with_conn(pool, move |conn| {
        let taken = users::table
            .find(&new_user.email)
            .count()
            .get_result::<i64>(conn)?
            > 0;
        if taken {
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }
        Ok(diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(conn)?)
    })
    .await?;

    log::info!("Registered user {}", user.email);
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// POST /users/login
///
/// Exchanges valid credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "identity"
)]
pub async fn login(
    pool: web::Data<DbPool>,
    hasher: web::Data<dyn SecretHasher>,
    issuer: web::Data<dyn TokenIssuer>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let email = body.email.clone();

    let user = with_conn(pool, move |conn| {
        Ok(users::table
            .find(&email)
            .select(User::as_select())
            .first(conn)
            .optional()?)
    })
    .await?;

    let password = body.password;
    let user = web::block(move || user.filter(|u| hasher.verify(&password, &u.password_hash)))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    // Unknown email and wrong password are indistinguishable to the caller.
    let Some(user) = user else {
        log::warn!("Failed login for {}", body.email);
        return Err(AppError::Unauthorized);
    };

    let token = issuer.issue(&user.email)?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/users/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "identity"
)]
pub async fn get_user(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();

    let user = with_conn(pool, move |conn| {
        users::table
            .find(&email)
            .select(User::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| DomainError::NotFound("User".to_string()))
    })
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

// ── Admins ───────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/admins",
    request_body = AdminRequest,
    responses(
        (status = 201, description = "Admin created", body = AdminResponse),
        (status = 400, description = "Invalid admin"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "identity"
)]
pub async fn create_admin(
    pool: web::Data<DbPool>,
    hasher: web::Data<dyn SecretHasher>,
    body: web::Json<AdminRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require_email("email", &body.email)?;
    require("mobile_number", &body.mobile_number)?;
    require_password(&body.password)?;

    let password_hash = hash_password(hasher, body.password).await?;
    let admin = Admin {
        password_hash,
        email: body.email,
        mobile_number: body.mobile_number,
        image_url: body.image_url,
    };

    let admin = with_conn(pool, move |conn| {
        Ok(diesel::insert_into(admins::table)
            .values(&admin)
            .returning(Admin::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(AdminResponse::from(admin)))
}

#[utoipa::path(
    get,
    path = "/admins/{email}",
    params(("email" = String, Path, description = "Admin email")),
    responses(
        (status = 200, description = "Admin found", body = AdminResponse),
        (status = 404, description = "Admin not found"),
    ),
    tag = "identity"
)]
pub async fn get_admin(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();

    let admin = with_conn(pool, move |conn| {
        admins::table
            .find(&email)
            .select(Admin::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| DomainError::NotFound("Admin".to_string()))
    })
    .await?;

    Ok(HttpResponse::Ok().json(AdminResponse::from(admin)))
}

// ── Employee roles ───────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/employee-roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = EmployeeRole),
        (status = 409, description = "Role name already exists"),
    ),
    tag = "identity"
)]
pub async fn create_role(
    pool: web::Data<DbPool>,
    body: web::Json<RoleRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require("name", &body.name)?;

    let role = with_conn(pool, move |conn| {
        Ok(diesel::insert_into(employee_roles::table)
            .values(&EmployeeRole {
                id: Uuid::new_v4(),
                name: body.name,
            })
            .returning(EmployeeRole::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(role))
}

#[utoipa::path(
    get,
    path = "/employee-roles",
    params(Pagination),
    responses((status = 200, description = "Page of roles", body = [EmployeeRole])),
    tag = "identity"
)]
pub async fn list_roles(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();

    let roles = with_conn(pool, move |conn| {
        Ok(employee_roles::table
            .select(EmployeeRole::as_select())
            .order(employee_roles::name.asc())
            .limit(limit)
            .offset(skip)
            .load(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(roles))
}

// ── Employees ────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/employees",
    request_body = EmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid employee"),
        (status = 409, description = "Unknown role"),
    ),
    tag = "identity"
)]
pub async fn create_employee(
    pool: web::Data<DbPool>,
    hasher: web::Data<dyn SecretHasher>,
    body: web::Json<EmployeeRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require("name", &body.name)?;
    require_password(&body.password)?;

    let password_hash = hash_password(hasher, body.password).await?;
    let new_employee = NewEmployee {
        id: Uuid::new_v4(),
        password_hash,
        name: body.name,
        employee_role_id: body.employee_role_id,
        image_url: body.image_url,
    };

    let employee = with_conn(pool, move |conn| {
        Ok(diesel::insert_into(employees::table)
            .values(&new_employee)
            .returning(Employee::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

#[utoipa::path(
    get,
    path = "/employees",
    params(Pagination),
    responses((status = 200, description = "Page of employees", body = [EmployeeResponse])),
    tag = "identity"
)]
pub async fn list_employees(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();

    let rows = with_conn(pool, move |conn| {
        Ok(employees::table
            .select(Employee::as_select())
            .order(employees::name.asc())
            .limit(limit)
            .offset(skip)
            .load(conn)?)
    })
    .await?;

    let body: Vec<EmployeeResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee UUID")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 404, description = "Employee not found"),
    ),
    tag = "identity"
)]
pub async fn get_employee(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let employee = with_conn(pool, move |conn| {
        employees::table
            .find(id)
            .select(Employee::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| DomainError::NotFound("Employee".to_string()))
    })
    .await?;

    Ok(HttpResponse::Ok().json(EmployeeResponse::from(employee)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const STORED_HASH: &str = "$2b$04$C6UzMDM.H6dfI/f/IKxGhu9QLbA1rs3b1ufyHZpX3H2UkV5zsHyi6";

    #[test]
    fn passwords_outside_the_accepted_length_are_rejected() {
        assert!(require_password("1234567").is_err());
        assert!(require_password("12345678").is_ok());
        assert!(require_password(&"x".repeat(72)).is_ok());
        assert!(require_password(&"x".repeat(73)).is_err());
    }

    #[test]
    fn user_response_never_carries_the_hash() {
        let user = User {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            gender: "female".to_string(),
            mobile_number: "0771234567".to_string(),
            password_hash: STORED_HASH.to_string(),
            image_url: None,
            is_verified: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).expect("json");

        assert_eq!(json["email"], "ada@example.com");
        assert!(!json.to_string().contains(STORED_HASH));
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn employee_response_never_carries_the_hash() {
        let employee = Employee {
            id: Uuid::new_v4(),
            name: "Sam".to_string(),
            employee_role_id: Uuid::new_v4(),
            image_url: None,
            password_hash: STORED_HASH.to_string(),
            is_active: true,
        };

        let json = serde_json::to_value(EmployeeResponse::from(employee)).expect("json");
        assert!(!json.to_string().contains(STORED_HASH));
    }
}
