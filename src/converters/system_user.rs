use crate::database::models::{NewSystemUser, SystemUser};
use crate::dto::{DtoSystemUser, DtoUserRegistrationRequest};

pub fn to_dto(user: &SystemUser, role_name: &str) -> DtoSystemUser {
    DtoSystemUser {
        id: user.id,
        user_name: user.user_name.clone(),
        email_address: user.email.clone(),
        phone_number: user.phone_number.clone(),
        role_name: role_name.to_string(),
    }
}

pub fn to_new_user(request: &DtoUserRegistrationRequest) -> NewSystemUser {
    NewSystemUser {
        user_name: request.user_name.trim().to_string(),
        email: request.email_address.trim().to_string(),
        phone_number: request.phone_number.trim().to_string(),
    }
}
