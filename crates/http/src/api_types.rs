//! Request bodies (Deserialize) and the small responses owned by this crate.

use repairdesk_core::Shop;
use repairdesk_service::{BookingRequest, ShopSearchRequest, StartCallsRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchShopsBody {
    #[serde(default)]
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub damage_description: String,
    pub radius: Option<u32>,
}

impl From<SearchShopsBody> for ShopSearchRequest {
    fn from(body: SearchShopsBody) -> Self {
        Self {
            location: body.location,
            damage_description: body.damage_description,
            radius_miles: body.radius,
            latitude: body.lat,
            longitude: body.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCallsBody {
    pub shops: Vec<Shop>,
    #[serde(default)]
    pub damage_description: String,
    pub limit: Option<usize>,
}

impl From<StartCallsBody> for StartCallsRequest {
    fn from(body: StartCallsBody) -> Self {
        Self { shops: body.shops, damage_description: body.damage_description, limit: body.limit }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBookingBody {
    pub shop: Shop,
    #[serde(default)]
    pub damage_description: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    pub preferred_time: Option<String>,
}

impl From<StartBookingBody> for BookingRequest {
    fn from(body: StartBookingBody) -> Self {
        Self {
            shop: body.shop,
            damage_description: body.damage_description,
            customer_name: body.customer_name,
            customer_phone: body.customer_phone,
            preferred_time: body.preferred_time,
        }
    }
}

#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct VersionResponse {
    pub version: &'static str,
}

