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

//! the http interface of the live waypoint cache. The only data end point is
//!
//!    GET <host>:<port>/livewaypoint?id=<url-encoded live waypoint id>
//!
//! which returns the JSON serialized [`LiveWaypointData`] or a textual error with status
//!   400 - invalid id or unsupported provider
//!   404 - no data yet (provider not eligible for a new request and nothing cached)
//!   502 - upstream fetch failed

use std::{net::SocketAddr, sync::Arc};
use axum::{
    extract::{Query,State},
    http::StatusCode,
    response::{IntoResponse,Response},
    routing::get,
    Json, Router
};
use serde::Deserialize;
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::{debug,info,warn};

use crate::{
    cache::LiveWaypointCache, errors::{OdinLiveWpError,Result},
    waypoint_id::LiveWaypointId, LiveWaypointData, ServerConfig
};

pub const LIVE_WAYPOINT_ROUTE: &str = "/livewaypoint";
pub const STATS_ROUTE: &str = "/livewaypoint/stats";

#[derive(Deserialize,Debug)]
pub struct LiveWaypointQuery {
    pub id: String,
}

pub fn build_router (cache: Arc<LiveWaypointCache>)->Router {
    Router::new()
        .route( LIVE_WAYPOINT_ROUTE, get( live_waypoint_handler))
        .route( STATS_ROUTE, get( stats_handler))
        .with_state( cache)
}

async fn live_waypoint_handler (State(cache): State<Arc<LiveWaypointCache>>, Query(q): Query<LiveWaypointQuery>)->Response {
    // axum already did the percent decoding
    let res = match LiveWaypointId::parse( &q.id) {
        Ok(id) => cache.get_data( &id).await,
        Err(e) => Err(e)
    };

    match res {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            let status = status_code_for( &e);
            debug!("live waypoint request for '{}' failed with {}: {}", q.id, status, e);
            (status, e.to_string()).into_response()
        }
    }
}

async fn stats_handler (State(cache): State<Arc<LiveWaypointCache>>)->Response {
    Json( cache.stats()).into_response()
}

pub fn status_code_for (e: &OdinLiveWpError)->StatusCode {
    if e.is_config_error() {
        StatusCode::BAD_REQUEST
    } else if let OdinLiveWpError::NoDataYet(_) = e {
        StatusCode::NOT_FOUND
    } else if e.is_fetch_error() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// bind to the configured socket address and serve the router until the task is aborted or fails
pub fn spawn_server_task (config: &ServerConfig, router: Router)->JoinHandle<Result<()>> {
    let sock_addr = config.sock_addr;

    tokio::spawn( async move {
        let listener = TcpListener::bind( sock_addr).await?;
        info!("serving live waypoints on http://{}{}", sock_addr, LIVE_WAYPOINT_ROUTE);
        axum::serve( listener, router.into_make_service_with_connect_info::<SocketAddr>()).await?;
        Ok(())
    })
}
