mod change_password;
mod register;

use wasl_test_utils::prelude::*;

use crate::{
    model::auth::{ChangePasswordDto, LoginDto, RegisterCompanyDto, RegisterProviderDto},
    server::{
        error::{auth::AuthError, Error},
        service::auth::AuthService,
    },
};

fn company_registration(email: &str) -> RegisterCompanyDto {
    RegisterCompanyDto {
        company_name: "Acme Trading".to_string(),
        business_registration_number: "1010123456".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        confirm_password: TEST_PASSWORD.to_string(),
        phone_number: TEST_PHONE_NUMBER.to_string(),
        address: "King Fahd Road".to_string(),
        region: TEST_REGION.to_string(),
        city: TEST_CITY.to_string(),
    }
}

fn provider_registration(email: &str) -> RegisterProviderDto {
    RegisterProviderDto {
        company_name: "Desert Freight".to_string(),
        business_registration_number: "1010654321".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        confirm_password: TEST_PASSWORD.to_string(),
        phone_number: TEST_PHONE_NUMBER.to_string(),
        address: "Industrial Area 2".to_string(),
        region: TEST_REGION.to_string(),
        city: TEST_CITY.to_string(),
        service_description: Some("Full truckload across the kingdom".to_string()),
    }
}
