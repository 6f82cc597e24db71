use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::handlers::{require, require_email, with_conn, Pagination};
use crate::models::geography::{City, District, Location, Province};
use crate::schema::{cities, districts, locations, provinces};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProvinceRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DistrictRequest {
    pub name: String,
    pub province_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CityRequest {
    pub name: String,
    pub district_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationRequest {
    pub state: String,
    pub city_id: Uuid,
    pub postal_code: String,
    pub user_email: String,
}

fn not_found(what: &str) -> DomainError {
    DomainError::NotFound(what.to_string())
}

// ── Provinces ────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/provinces",
    request_body = ProvinceRequest,
    responses(
        (status = 201, description = "Province created", body = Province),
        (status = 400, description = "Invalid province"),
    ),
    tag = "geography"
)]
pub async fn create_province(
    pool: web::Data<DbPool>,
    body: web::Json<ProvinceRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require("name", &body.name)?;

    let province = with_conn(pool, move |conn| {
        Ok(diesel::insert_into(provinces::table)
            .values(&Province {
                id: Uuid::new_v4(),
                name: body.name,
            })
            .returning(Province::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(province))
}

#[utoipa::path(
    get,
    path = "/provinces",
    params(Pagination),
    responses((status = 200, description = "Page of provinces", body = [Province])),
    tag = "geography"
)]
pub async fn list_provinces(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();

    let rows = with_conn(pool, move |conn| {
        Ok(provinces::table
            .select(Province::as_select())
            .order(provinces::name.asc())
            .limit(limit)
            .offset(skip)
            .load(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/provinces/{id}",
    params(("id" = Uuid, Path, description = "Province UUID")),
    responses(
        (status = 200, description = "Province found", body = Province),
        (status = 404, description = "Province not found"),
    ),
    tag = "geography"
)]
pub async fn get_province(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let province = with_conn(pool, move |conn| {
        provinces::table
            .find(id)
            .select(Province::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| not_found("Province"))
    })
    .await?;

    Ok(HttpResponse::Ok().json(province))
}

// ── Districts ────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/districts",
    request_body = DistrictRequest,
    responses(
        (status = 201, description = "District created", body = District),
        (status = 409, description = "Unknown province"),
    ),
    tag = "geography"
)]
pub async fn create_district(
    pool: web::Data<DbPool>,
    body: web::Json<DistrictRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require("name", &body.name)?;

    let district = with_conn(pool, move |conn| {
        Ok(diesel::insert_into(districts::table)
            .values(&District {
                id: Uuid::new_v4(),
                name: body.name,
                province_id: body.province_id,
            })
            .returning(District::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(district))
}

#[utoipa::path(
    get,
    path = "/districts",
    params(Pagination),
    responses((status = 200, description = "Page of districts", body = [District])),
    tag = "geography"
)]
pub async fn list_districts(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();

    let rows = with_conn(pool, move |conn| {
        Ok(districts::table
            .select(District::as_select())
            .order(districts::name.asc())
            .limit(limit)
            .offset(skip)
            .load(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/districts/{id}",
    params(("id" = Uuid, Path, description = "District UUID")),
    responses(
        (status = 200, description = "District found", body = District),
        (status = 404, description = "District not found"),
    ),
    tag = "geography"
)]
pub async fn get_district(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let district = with_conn(pool, move |conn| {
        districts::table
            .find(id)
            .select(District::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| not_found("District"))
    })
    .await?;

    Ok(HttpResponse::Ok().json(district))
}

// ── Cities ───────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/cities",
    request_body = CityRequest,
    responses(
        (status = 201, description = "City created", body = City),
        (status = 409, description = "Unknown district"),
    ),
    tag = "geography"
)]
pub async fn create_city(
    pool: web::Data<DbPool>,
    body: web::Json<CityRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require("name", &body.name)?;

    let city = with_conn(pool, move |conn| {
        Ok(diesel::insert_into(cities::table)
            .values(&City {
                id: Uuid::new_v4(),
                name: body.name,
                district_id: body.district_id,
            })
            .returning(City::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(city))
}

#[utoipa::path(
    get,
    path = "/cities",
    params(Pagination),
    responses((status = 200, description = "Page of cities", body = [City])),
    tag = "geography"
)]
pub async fn list_cities(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();

    let rows = with_conn(pool, move |conn| {
        Ok(cities::table
            .select(City::as_select())
            .order(cities::name.asc())
            .limit(limit)
            .offset(skip)
            .load(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/cities/{id}",
    params(("id" = Uuid, Path, description = "City UUID")),
    responses(
        (status = 200, description = "City found", body = City),
        (status = 404, description = "City not found"),
    ),
    tag = "geography"
)]
pub async fn get_city(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let city = with_conn(pool, move |conn| {
        cities::table
            .find(id)
            .select(City::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| not_found("City"))
    })
    .await?;

    Ok(HttpResponse::Ok().json(city))
}

// ── Locations ────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/locations",
    request_body = LocationRequest,
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 400, description = "Invalid location"),
        (status = 409, description = "Unknown city or user"),
    ),
    tag = "geography"
)]
pub async fn create_location(
    pool: web::Data<DbPool>,
    body: web::Json<LocationRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require("state", &body.state)?;
    require("postal_code", &body.postal_code)?;
    require_email("user_email", &body.user_email)?;

    let location = with_conn(pool, move |conn| {
        Ok(diesel::insert_into(locations::table)
            .values(&Location {
                id: Uuid::new_v4(),
                state: body.state,
                city_id: body.city_id,
                postal_code: body.postal_code,
                user_email: body.user_email,
            })
            .returning(Location::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(location))
}

#[utoipa::path(
    get,
    path = "/locations",
    params(Pagination),
    responses((status = 200, description = "Page of locations", body = [Location])),
    tag = "geography"
)]
pub async fn list_locations(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();

    let rows = with_conn(pool, move |conn| {
        Ok(locations::table
            .select(Location::as_select())
            .order(locations::postal_code.asc())
            .limit(limit)
            .offset(skip)
            .load(conn)?)
    })
    .await?;

    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/locations/{id}",
    params(("id" = Uuid, Path, description = "Location UUID")),
    responses(
        (status = 200, description = "Location found", body = Location),
        (status = 404, description = "Location not found"),
    ),
    tag = "geography"
)]
pub async fn get_location(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let location = with_conn(pool, move |conn| {
        locations::table
            .find(id)
            .select(Location::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| not_found("Location"))
    })
    .await?;

    Ok(HttpResponse::Ok().json(location))
}
