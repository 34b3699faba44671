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

use std::{fs, sync::Arc, time::Duration};
use chrono::{DateTime,TimeZone,Utc};
use odin_livewp::{
    errors::OdinLiveWpError,
    provider::{find_me_spot::parse_spot_feed, garmin_inreach::parse_mapshare_kml, TestPosProvider},
    Clock, LiveWaypointId, LiveWaypointProvider, LiveWpConfig, ManualClock
};

#[test]
fn test_parse_mapshare_kml () {
    let kml = fs::read_to_string("resources/mapshare.kml").unwrap();
    let id = LiveWaypointId::parse("livewp://GarminInreach/JanePilot").unwrap();

    let rec = parse_mapshare_kml( &id, &kml, "https://share.garmin.com").unwrap();
    println!("{rec:#?}");

    assert_eq!( rec.id, id);
    assert_eq!( rec.name, "Jane Pilot");
    assert_eq!( rec.timestamp, Utc.with_ymd_and_hms( 2024, 5, 1, 10, 0, 0).unwrap()); // the latest placemark
    assert_eq!( rec.longitude, 11.8395);
    assert_eq!( rec.latitude, 47.6712);
    assert_eq!( rec.altitude, 1410.0);
    assert_eq!( rec.details_link, "https://share.garmin.com/JanePilot");
    assert!( rec.description.contains("Velocity: 28.0 km/h"));
    assert!( rec.description.contains("Emergency: False"));
    assert!( rec.description.contains("Text: Landed safe & sound"));
    assert!( rec.description.contains("Device Type: inReach Mini"));
}

#[test]
fn test_mapshare_missing_fields () {
    let id = LiveWaypointId::parse("livewp://GarminInreach/JanePilot").unwrap();
    let kml = r#"<kml><Document><Folder>
        <Placemark><name>JP</name><TimeStamp><when>2024-05-01T10:00:00Z</when></TimeStamp>
          <ExtendedData><Data name="Velocity"><value>10 km/h</value></Data></ExtendedData>
          <Point><coordinates>11.0,47.0</coordinates></Point>
        </Placemark>
      </Folder></Document></kml>"#;

    let rec = parse_mapshare_kml( &id, kml, "https://share.garmin.com/").unwrap();
    assert_eq!( rec.name, "JP");
    assert_eq!( rec.altitude, 0.0);
    assert_eq!( rec.details_link, "https://share.garmin.com/JanePilot");
    assert_eq!( rec.description, "Velocity: 10 km/h<br/>Course: N/A<br/>Emergency: N/A<br/>Event: N/A<br/>Text: N/A<br/>Device Type: N/A");
}

#[test]
fn test_mapshare_character_references () {
    let id = LiveWaypointId::parse("livewp://GarminInreach/JanePilot").unwrap();
    let kml = r#"<kml><Placemark><name>Jane&#39;s inReach</name><TimeStamp><when>2024-05-01T10:00:00Z</when></TimeStamp>
          <ExtendedData><Data name="Text"><value>It&#x2019;s windy &lt;30km/h&gt; &amp;lt; &#xD800;</value></Data></ExtendedData>
          <Point><coordinates>11.0,47.0</coordinates></Point>
        </Placemark></kml>"#;

    let rec = parse_mapshare_kml( &id, kml, "https://share.garmin.com").unwrap();
    assert_eq!( rec.name, "Jane's inReach");
    // escaped entities are not resolved twice, surrogates are not characters
    assert!( rec.description.contains("Text: It\u{2019}s windy <30km/h> &lt; &#xD800;"), "{}", rec.description);
}

#[test]
fn test_mapshare_without_position () {
    let id = LiveWaypointId::parse("livewp://GarminInreach/JanePilot").unwrap();

    let empty = r#"<?xml version="1.0" encoding="utf-8"?><kml xmlns="http://www.opengis.net/kml/2.2"><Document><name>KML Export</name></Document></kml>"#;
    let res = parse_mapshare_kml( &id, empty, "https://share.garmin.com");
    assert!( matches!( res, Err(OdinLiveWpError::FetchError(_))));

    let no_time = r#"<kml><Placemark><name>JP</name><Point><coordinates>11.0,47.0</coordinates></Point></Placemark></kml>"#;
    assert!( parse_mapshare_kml( &id, no_time, "https://share.garmin.com").is_err());

    let bad_coords = r#"<kml><Placemark><TimeStamp><when>2024-05-01T10:00:00Z</when></TimeStamp><Point><coordinates>east,47.0</coordinates></Point></Placemark></kml>"#;
    let e = parse_mapshare_kml( &id, bad_coords, "https://share.garmin.com").unwrap_err();
    println!("got expected error: {e}");
    assert!( e.is_fetch_error());
}

#[test]
fn test_parse_spot_feed () {
    let json = fs::read_to_string("resources/spot_latest.json").unwrap();
    let id = LiveWaypointId::parse("livewp://FindMeSpot/0onlLopfoM4bG5jXvWRE8H0Obd0oMxMBq").unwrap();

    let rec = parse_spot_feed( &id, &json).unwrap();
    println!("{rec:#?}");

    assert_eq!( rec.name, "Spot Gen4");
    assert_eq!( rec.timestamp, DateTime::<Utc>::from_timestamp( 1714557600, 0).unwrap());
    assert_eq!( rec.latitude, 47.5101);
    assert_eq!( rec.longitude, 11.2250);
    assert_eq!( rec.altitude, 1210.0);
    assert_eq!( rec.details_link, "");
    assert_eq!( rec.description, "Message type: OK<br/>Battery: LOW<br/>Model: SPOT4<br/>Message: All good");
}

#[test]
fn test_parse_spot_single_message () {
    let json = fs::read_to_string("resources/spot_single.json").unwrap();
    let id = LiveWaypointId::parse("livewp://FindMeSpot/abcdefgh12345678").unwrap();

    let rec = parse_spot_feed( &id, &json).unwrap();
    assert_eq!( rec.name, "Single Feed"); // no messenger name, fall back to feed name
    assert_eq!( rec.altitude, 0.0);
    assert!( rec.description.ends_with("Message: N/A"));
}

#[test]
fn test_parse_spot_error () {
    let json = fs::read_to_string("resources/spot_error.json").unwrap();
    let id = LiveWaypointId::parse("livewp://FindMeSpot/abcdefgh12345678").unwrap();

    match parse_spot_feed( &id, &json) {
        Err(OdinLiveWpError::FetchError(msg)) => {
            println!("got expected error: {msg}");
            assert!( msg.contains("E-0195"));
        }
        other => panic!("expected fetch error, got {other:?}")
    }

    assert!( parse_spot_feed( &id, "<html>service unavailable</html>").unwrap_err().is_fetch_error());
}

#[tokio::test]
async fn test_test_pos_provider () {
    let config = LiveWpConfig::default().test_pos;
    let start = Utc.with_ymd_and_hms( 2024, 5, 1, 0, 0, 0).unwrap();
    let clock = Arc::new( ManualClock::new( start));
    let provider = TestPosProvider::new( config.clone(), clock.clone());
    let id = LiveWaypointId::parse("livewp://TestPos/pilot1").unwrap();

    // minute 0 of the day: bearing north
    let rec = provider.fetch( &id).await.unwrap();
    assert_eq!( rec.timestamp, start);
    assert!( (rec.longitude - config.longitude).abs() < 1e-9);
    let expected_lat = config.latitude + config.radius / 111_320.0;
    assert!( (rec.latitude - expected_lat).abs() < 1e-9);
    assert_eq!( rec.altitude, config.altitude);

    // always eligible, but reporting a nominal next request date
    assert!( provider.can_request( &id, start));
    assert_eq!( provider.next_request_date( &id, start), start + chrono::TimeDelta::seconds(60));

    // 90 min later: bearing east
    clock.advance( Duration::from_secs( 90*60));
    let rec = provider.fetch( &id).await.unwrap();
    println!("{rec:#?}");
    assert!( rec.longitude > config.longitude);
    assert!( (rec.latitude - config.latitude).abs() < 1e-9);

    // deterministic for a given time
    assert_eq!( provider.position_at( clock.now()), (rec.longitude, rec.latitude));
}

#[tokio::test]
async fn test_provider_type_mismatch () {
    let clock = Arc::new( ManualClock::from_epoch_secs( 1714557600));
    let provider = TestPosProvider::new( LiveWpConfig::default().test_pos, clock);
    let id = LiveWaypointId::parse("livewp://GarminInreach/JanePilot").unwrap();
    assert!( provider.fetch( &id).await.is_err());
}
