/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

#![allow(unused)]

use thiserror::Error;
use reqwest;
use serde_json;
use ron;

pub type Result<T> = std::result::Result<T,OdinLiveWpError>;


#[derive(Error,Debug)]
pub enum OdinLiveWpError {
    #[error("invalid live waypoint id {0}")]
    InvalidIdError(String),

    #[error("no live waypoint data yet for {0}")]
    NoDataYet(String),

    #[error("no provider for {0}")]
    UnsupportedProviderError(String),

    #[error("fetch error {0}")]
    FetchError(String),

    #[error("parse error {0}")]
    ParseError(String),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("reqwest error {0}")]
    ReqwestError( #[from] reqwest::Error),

    #[error("serde error {0}")]
    SerdeError( #[from] serde_json::Error),

    #[error("config RON error {0}")]
    RonError( #[from] ron::error::SpannedError),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

impl OdinLiveWpError {
    /// errors that are caused by the request itself and hence should not be retried
    pub fn is_config_error (&self)->bool {
        matches!( self, OdinLiveWpError::InvalidIdError(_) | OdinLiveWpError::UnsupportedProviderError(_))
    }

    /// errors of the upstream round trip (transport or malformed provider payload)
    pub fn is_fetch_error (&self)->bool {
        matches!( self,
            OdinLiveWpError::FetchError(_) | OdinLiveWpError::ReqwestError(_) |
            OdinLiveWpError::SerdeError(_) | OdinLiveWpError::ParseError(_)
        )
    }
}

macro_rules! parse_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::OdinLiveWpError::ParseError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use parse_error;

macro_rules! fetch_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::OdinLiveWpError::FetchError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use fetch_error;

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::OdinLiveWpError::OpFailedError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;
