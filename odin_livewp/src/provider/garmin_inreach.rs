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

use std::{collections::HashMap, sync::Arc};
use chrono::{DateTime,Utc};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use tracing::debug;

use crate::{
    clock::Clock, errors::{fetch_error, parse_error, Result},
    polling::PollingState, waypoint_id::{LiveWaypointId,ProviderType},
    FeedConfig, LiveWaypointRecord
};
use super::{check_provider_type, format_description, get_text, LiveWaypointProvider};

/// Garmin inReach MapShare feeds. The payload of the id is the MapShare name, the feed is a KML document
/// with one point placemark per reported position (plus a track LineString we don't care about)
pub struct GarminInreachProvider {
    config: FeedConfig,
    client: Client,
    clock: Arc<dyn Clock>,
    polling_state: PollingState,
}

impl GarminInreachProvider {
    pub fn new (config: FeedConfig, client: Client, clock: Arc<dyn Clock>)->Self {
        let polling_state = PollingState::new( config.min_interval);
        GarminInreachProvider { config, client, clock, polling_state }
    }

    pub fn feed_url (&self, mapshare: &str)->String {
        format!("{}/Feed/Share/{}", self.config.base_url.trim_end_matches('/'), mapshare)
    }
}

#[async_trait]
impl LiveWaypointProvider for GarminInreachProvider {
    fn provider_type (&self)->ProviderType { ProviderType::GarminInreach }

    fn polling_state (&self)->&PollingState { &self.polling_state }

    async fn fetch (&self, id: &LiveWaypointId)->Result<LiveWaypointRecord> {
        check_provider_type( id, ProviderType::GarminInreach)?;

        let url = self.feed_url( id.payload());
        debug!("requesting {}", url);
        let kml = get_text( &self.client, &url, "application/vnd.google-earth.kml+xml, application/xml, text/xml").await?;
        let record = parse_mapshare_kml( id, &kml, &self.config.base_url)?;

        self.polling_state.record_request( &id.to_string(), self.clock.now());
        Ok(record)
    }
}

/* #region KML extraction ***************************************************************************/

// MapShare KML is small and flat enough so that we don't need a full XML/KML parser for the few elements we need
lazy_static! {
    static ref PLACEMARK_RE: Regex = Regex::new( r"(?s)<Placemark[^>]*>(.*?)</Placemark>").unwrap();
    static ref WHEN_RE: Regex = Regex::new( r"(?s)<when>\s*([^<]+?)\s*</when>").unwrap();
    static ref COORDS_RE: Regex = Regex::new( r"(?s)<Point[^>]*>.*?<coordinates>\s*([^<]+?)\s*</coordinates>").unwrap();
    static ref ENTITY_RE: Regex = Regex::new( r"&(#[xX][0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);").unwrap();
    static ref NAME_RE: Regex = Regex::new( r"(?s)<name>\s*(.*?)\s*</name>").unwrap();
    // [name, value]
    static ref DATA_RE: Regex = Regex::new( r#"(?s)<Data\s+name="([^"]+)"\s*>\s*(?:<displayName>.*?</displayName>\s*)?(?:<value>(.*?)</value>|<value\s*/>)"#).unwrap();
}

struct Placemark<'a> {
    name: Option<&'a str>,
    when: DateTime<Utc>,
    lon: f64,
    lat: f64,
    alt: f64,
    data: HashMap<&'a str,&'a str>,
}

/// turn a MapShare KML document into the record of its latest timestamped point placemark
pub fn parse_mapshare_kml (id: &LiveWaypointId, kml: &str, base_url: &str)->Result<LiveWaypointRecord> {
    let mut latest: Option<Placemark> = None;

    for cap in PLACEMARK_RE.captures_iter( kml) {
        if let Some(pm) = parse_placemark( cap.get(1).map( |m| m.as_str()).unwrap_or_default())? {
            if latest.as_ref().map( |l| pm.when > l.when).unwrap_or(true) {
                latest = Some(pm);
            }
        }
    }

    let pm = latest.ok_or_else( || fetch_error!("no timestamped position in MapShare feed for {}", id))?;

    let name = pm.data.get("Name").map( |s| xml_unescape(s))
        .filter( |s| !s.trim().is_empty())
        .or_else( || pm.name.map( xml_unescape))
        .unwrap_or_else( || id.payload().to_string());

    let data_value = |key: &str| pm.data.get( key).map( |s| xml_unescape(s));
    let velocity = data_value("Velocity");
    let course = data_value("Course");
    let emergency = data_value("In Emergency");
    let event = data_value("Event");
    let text = data_value("Text");
    let device_type = data_value("Device Type");

    let description = format_description( &[
        ("Velocity", velocity.as_deref()),
        ("Course", course.as_deref()),
        ("Emergency", emergency.as_deref()),
        ("Event", event.as_deref()),
        ("Text", text.as_deref()),
        ("Device Type", device_type.as_deref()),
    ]);

    Ok( LiveWaypointRecord {
        id: id.clone(),
        name,
        description,
        details_link: format!("{}/{}", base_url.trim_end_matches('/'), id.payload()),
        latitude: pm.lat,
        longitude: pm.lon,
        altitude: pm.alt,
        timestamp: pm.when
    })
}

/// Ok(None) for placemarks that are not timestamped points (e.g. the track line)
fn parse_placemark<'a> (s: &'a str)->Result<Option<Placemark<'a>>> {
    let (Some(when_cap),Some(coords_cap)) = (WHEN_RE.captures(s), COORDS_RE.captures(s)) else { return Ok(None) };

    let when_str = when_cap.get(1).map( |m| m.as_str()).unwrap_or_default();
    let when = DateTime::parse_from_rfc3339( when_str)
        .map_err( |e| parse_error!("invalid placemark time '{}': {}", when_str, e))?
        .with_timezone( &Utc);

    let coords_str = coords_cap.get(1).map( |m| m.as_str()).unwrap_or_default();
    let (lon,lat,alt) = parse_coordinates( coords_str)?;

    let name = NAME_RE.captures(s).and_then( |c| c.get(1)).map( |m| m.as_str());

    let mut data: HashMap<&str,&str> = HashMap::new();
    for cap in DATA_RE.captures_iter(s) {
        if let Some(key) = cap.get(1) {
            data.insert( key.as_str(), cap.get(2).map( |m| m.as_str()).unwrap_or_default());
        }
    }

    Ok( Some( Placemark { name, when, lon, lat, alt, data }) )
}

/// KML coordinates are `lon,lat[,alt]`
fn parse_coordinates (s: &str)->Result<(f64,f64,f64)> {
    let mut it = s.split(',').map( str::trim);
    let lon = parse_f64( it.next(), "longitude")?;
    let lat = parse_f64( it.next(), "latitude")?;
    let alt = match it.next() {
        Some(v) if !v.is_empty() => v.parse::<f64>().map_err( |_| parse_error!("invalid altitude '{}'", v))?,
        _ => 0.0
    };

    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err( parse_error!("coordinates out of range: '{}'", s))
    }
    Ok( (lon,lat,alt) )
}

fn parse_f64 (v: Option<&str>, what: &str)->Result<f64> {
    let v = v.ok_or_else( || parse_error!("missing {}", what))?;
    v.parse::<f64>().map_err( |_| parse_error!("invalid {} '{}'", what, v))
}

/// resolve predefined entities and numeric character references in one pass (so that "&amp;lt;" stays "&lt;").
/// Unknown or invalid references are kept as they are
fn xml_unescape (s: &str)->String {
    if !s.contains('&') { return s.to_string() }

    ENTITY_RE.replace_all( s, |caps: &regex::Captures| {
        let name = &caps[1];
        let c = match name {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "amp" => Some('&'),
            _ => {
                let code = if let Some(hex) = name.strip_prefix("#x").or_else( || name.strip_prefix("#X")) {
                    u32::from_str_radix( hex, 16).ok()
                } else {
                    name[1..].parse::<u32>().ok()
                };
                code.and_then( char::from_u32)
            }
        };
        match c {
            Some(c) => c.to_string(),
            None => caps[0].to_string()
        }
    }).into_owned()
}

/* #endregion KML extraction */
