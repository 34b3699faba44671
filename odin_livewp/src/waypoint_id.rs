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

use std::{fmt, str::FromStr};
use regex::Regex;
use lazy_static::lazy_static;
use serde::{Serialize,Serializer,Deserialize,Deserializer,de::Error as DeError};
use url::form_urlencoded;

use crate::errors::{OdinLiveWpError,Result};

pub const LIVE_WAYPOINT_SCHEME: &str = "livewp";

lazy_static! {
    // [scheme,provider,payload]
    static ref ID_RE: Regex = Regex::new( r"^([A-Za-z][A-Za-z0-9+.\-]*)://([A-Za-z]+)/(.*)$").unwrap();

    static ref MAPSHARE_RE: Regex = Regex::new( r"^[A-Za-z0-9._\-]{1,64}$").unwrap();
    static ref SPOT_FEED_RE: Regex = Regex::new( r"^[A-Za-z0-9]{8,64}$").unwrap();
    static ref TEST_PAYLOAD_RE: Regex = Regex::new( r"^[A-Za-z0-9._\-]{1,64}$").unwrap();
}

/// the upstream services we can get live waypoints from
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub enum ProviderType {
    GarminInreach,
    FindMeSpot,
    TestPos,
}

impl ProviderType {
    pub const ALL: [ProviderType;3] = [ProviderType::GarminInreach, ProviderType::FindMeSpot, ProviderType::TestPos];

    pub fn as_str (&self)->&'static str {
        match self {
            ProviderType::GarminInreach => "GarminInreach",
            ProviderType::FindMeSpot => "FindMeSpot",
            ProviderType::TestPos => "TestPos",
        }
    }

    /// case insensitive lookup
    pub fn from_name (name: &str)->Option<ProviderType> {
        ProviderType::ALL.into_iter().find( |pt| pt.as_str().eq_ignore_ascii_case( name))
    }

    fn is_valid_payload (&self, payload: &str)->bool {
        match self {
            ProviderType::GarminInreach => MAPSHARE_RE.is_match( payload),
            ProviderType::FindMeSpot => SPOT_FEED_RE.is_match( payload),
            ProviderType::TestPos => TEST_PAYLOAD_RE.is_match( payload),
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str( self.as_str())
    }
}

/// a validated `livewp://<provider-type>/<payload>` identifier.
/// The payload is opaque for everything but the provider that has to interpret it.
/// Equality and hashing are based on the canonical form, i.e. two ids are equal iff their
/// `to_string()` values are equal
#[derive(Debug,Clone,PartialEq,Eq,Hash)]
pub struct LiveWaypointId {
    provider_type: ProviderType,
    payload: String,
}

impl LiveWaypointId {
    pub fn new (provider_type: ProviderType, payload: impl ToString)->Result<Self> {
        let payload = payload.to_string();
        if provider_type.is_valid_payload( &payload) {
            Ok( LiveWaypointId{ provider_type, payload } )
        } else {
            Err( OdinLiveWpError::InvalidIdError( format!("malformed {} payload '{}'", provider_type, payload)))
        }
    }

    pub fn parse (raw: &str)->Result<Self> {
        let raw = raw.trim();
        let cap = ID_RE.captures( raw).ok_or_else(|| OdinLiveWpError::InvalidIdError( format!("not a live waypoint uri '{raw}'")))?;

        let scheme = &cap[1];
        if !scheme.eq_ignore_ascii_case( LIVE_WAYPOINT_SCHEME) {
            return Err( OdinLiveWpError::InvalidIdError( format!("unknown scheme '{scheme}' in '{raw}'")))
        }

        let provider_name = &cap[2];
        let provider_type = ProviderType::from_name( provider_name)
            .ok_or_else(|| OdinLiveWpError::InvalidIdError( format!("unknown provider type '{provider_name}' in '{raw}'")))?;

        LiveWaypointId::new( provider_type, &cap[3])
    }

    pub fn provider_type (&self)->ProviderType { self.provider_type }
    pub fn payload (&self)->&str { self.payload.as_str() }

    /// the canonical id in URL-encoded form so that it can be passed as a query parameter
    pub fn to_query_param (&self)->String {
        form_urlencoded::byte_serialize( self.to_string().as_bytes()).collect()
    }

    pub fn from_query_param (param: &str)->Result<Self> {
        let decoded: String = form_urlencoded::parse( format!("id={param}").as_bytes())
            .find( |(k,_)| k == "id")
            .map( |(_,v)| v.into_owned())
            .unwrap_or_default();
        LiveWaypointId::parse( &decoded)
    }
}

impl fmt::Display for LiveWaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}://{}/{}", LIVE_WAYPOINT_SCHEME, self.provider_type, self.payload)
    }
}

impl FromStr for LiveWaypointId {
    type Err = OdinLiveWpError;
    fn from_str (s: &str)->Result<Self> { LiveWaypointId::parse(s) }
}

impl Serialize for LiveWaypointId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        serializer.serialize_str( &self.to_string())
    }
}

impl<'de> Deserialize<'de> for LiveWaypointId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let s = String::deserialize( deserializer)?;
        LiveWaypointId::parse( &s).map_err( |e| DeError::custom( e.to_string()))
    }
}
