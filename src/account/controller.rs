use std::sync::Arc;

use tracing::{error, info, warn};

use super::{
    model::Account,
    service::AccountService,
    validation::{validate_account, validate_account_number, validate_name},
};
use crate::{
    constants::{
        ACCOUNT_NUMBER_PARAM, BAD_REQUEST, CREATED, INTERNAL_ERROR, NAME_PARAM, NOT_FOUND,
        OK_RESPONSE,
    },
    error::CustomError,
    req::Request,
    utils::{des_from_str, error_body, ser_to_str},
};

pub struct AccountController {
    service: Arc<dyn AccountService>,
}

impl AccountController {
    pub fn new(service: Arc<dyn AccountService>) -> Self {
        AccountController { service }
    }

    pub async fn get_accounts(&self, request: &Request) -> (String, String) {
        let name = request.query_param(NAME_PARAM).map(str::to_string);
        let account_number = request
            .query_param(ACCOUNT_NUMBER_PARAM)
            .map(str::to_string);

        if let Some(number) = account_number.as_deref() {
            if let Err(err) = validate_account_number(number) {
                return reject(err);
            }
        }
        if let Some(name) = name.as_deref() {
            if let Err(err) = validate_name(name) {
                return reject(err);
            }
        }

        match self.service.get_accounts(name, account_number).await {
            Ok(accounts) => json_response(OK_RESPONSE, &accounts),
            Err(err) => failure(err),
        }
    }

    pub async fn add_account(&self, request: &Request) -> (String, String) {
        let account: Account = match des_from_str(&request.body) {
            Ok(account) => account,
            Err(err) => return reject(err),
        };
        if let Some(id) = &account.id {
            return reject(CustomError::InvalidBody(format!(
                "id '{}' must not be set on create",
                id
            )));
        }
        if let Err(err) = validate_account(&account) {
            return reject(err);
        }

        match self.service.add_account(account).await {
            Ok(created) => json_response(CREATED, &created),
            Err(err) => failure(err),
        }
    }

    pub async fn update_account(&self, id: &str, request: &Request) -> (String, String) {
        let mut account: Account = match des_from_str(&request.body) {
            Ok(account) => account,
            Err(err) => return reject(err),
        };
        match account.id.as_deref() {
            Some(body_id) if body_id != id => {
                return reject(CustomError::IdMismatch {
                    path: id.to_string(),
                    body: body_id.to_string(),
                });
            }
            Some(_) => {}
            None => account.id = Some(id.to_string()),
        }
        if let Err(err) = validate_account(&account) {
            return reject(err);
        }

        match self.service.update_account(account).await {
            Ok(()) => (OK_RESPONSE.to_string(), "".to_string()),
            Err(err) => failure(err),
        }
    }

    pub async fn delete_account(&self, id: &str) -> (String, String) {
        match self.service.delete_account(id.to_string()).await {
            Ok(()) => (OK_RESPONSE.to_string(), "".to_string()),
            Err(err) => failure(err),
        }
    }
}

fn json_response<T: serde::Serialize>(status_line: &str, value: &T) -> (String, String) {
    match ser_to_str(value) {
        Ok(json) => (status_line.to_string(), json),
        Err(err) => {
            error!("serde error: {}", err);
            (INTERNAL_ERROR.to_string(), "".to_string())
        }
    }
}

fn reject(err: CustomError) -> (String, String) {
    info!("rejected request: {}", err);
    (BAD_REQUEST.to_string(), error_body(&err))
}

fn failure(err: CustomError) -> (String, String) {
    match err {
        CustomError::AccountNotFound(ref id) => {
            warn!("account {} not found", id);
            (NOT_FOUND.to_string(), error_body(&err))
        }
        err if err.is_client_error() => reject(err),
        err => {
            error!("account service error: {:?}", err);
            (INTERNAL_ERROR.to_string(), "".to_string())
        }
    }
}
