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

use std::{collections::HashMap, sync::{Arc,Mutex,MutexGuard,PoisonError}};
use chrono::{DateTime,Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug,info,warn};

use crate::{
    clock::{time_delta, Clock}, errors::{OdinLiveWpError, Result},
    provider::{LiveWaypointProvider, ProviderMap}, waypoint_id::{LiveWaypointId,ProviderType},
    CacheConfig, LiveWaypointData, LiveWaypointRecord
};

/// what followers of an in-flight upstream request receive. Errors are not Clone so we only pass on the message
type FlightResult = std::result::Result<LiveWaypointData,String>;

#[derive(Debug,Clone)]
struct CacheEntry {
    record: LiveWaypointRecord,
    fetched_at: DateTime<Utc>,
}

struct InFlight {
    flight_id: u64,
    tx: broadcast::Sender<FlightResult>,
}

#[derive(Serialize,Debug,Default,Clone,Copy,PartialEq,Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub requests: u64,
    pub upstream_fetches: u64,
    pub cache_hits: u64,
    pub coalesced: u64,  // requests that waited for an already running upstream fetch
    pub fetch_failures: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String,CacheEntry>, // keyed by canonical id
    in_flight: HashMap<String,InFlight>,
    next_flight_id: u64,
    stats: CacheStats,
}

enum Role {
    Leader(u64, broadcast::Sender<FlightResult>),
    Follower(broadcast::Receiver<FlightResult>),
}

/// the shared live waypoint store that sits between clients and rate limited providers.
///
/// Each request either returns the cached record (if the provider is not yet eligible for a new request),
/// performs a single upstream fetch, or waits for an upstream fetch of the same id that is already running.
/// All map access happens within one mutex region that is never held across an await point
pub struct LiveWaypointCache {
    providers: ProviderMap,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl LiveWaypointCache {
    pub fn new (providers: ProviderMap, clock: Arc<dyn Clock>, config: CacheConfig)->Self {
        LiveWaypointCache { providers, clock, config, state: Mutex::new( CacheState::default()) }
    }

    pub fn provider (&self, provider_type: ProviderType)->Option<&Arc<dyn LiveWaypointProvider>> {
        self.providers.get( &provider_type)
    }

    pub fn clock (&self)->&Arc<dyn Clock> { &self.clock }

    fn lock_state (&self)->MutexGuard<'_,CacheState> {
        self.state.lock().unwrap_or_else( PoisonError::into_inner)
    }

    /// get the latest data we have for `id` together with the earliest date at which new data can be expected.
    /// This only triggers an upstream request if the respective provider is eligible for one
    pub async fn get_data (&self, id: &LiveWaypointId)->Result<LiveWaypointData> {
        let provider = self.providers.get( &id.provider_type()).cloned()
            .ok_or_else( || OdinLiveWpError::UnsupportedProviderError( id.provider_type().to_string()))?;
        let key = id.to_string();
        let now = self.clock.now();

        let role = {
            let mut guard = self.lock_state();
            let st = &mut *guard;
            st.stats.requests += 1;

            if let Some(flight) = st.in_flight.get( &key) {
                st.stats.coalesced += 1;
                debug!("waiting for in-flight request of {}", key);
                Role::Follower( flight.tx.subscribe())

            } else if !provider.can_request( id, now) {
                let next_request_date = provider.next_request_date( id, now);
                return match st.entries.get( &key) {
                    Some(entry) => {
                        st.stats.cache_hits += 1;
                        Ok( LiveWaypointData { record: entry.record.clone(), next_request_date })
                    }
                    None => Err( OdinLiveWpError::NoDataYet( key))
                }

            } else {
                let flight_id = st.next_flight_id;
                st.next_flight_id += 1;
                st.stats.upstream_fetches += 1;

                let (tx,_) = broadcast::channel(1);
                st.in_flight.insert( key.clone(), InFlight { flight_id, tx: tx.clone() });
                Role::Leader( flight_id, tx)
            }
        };

        match role {
            Role::Leader( flight_id, tx) => self.fetch_as_leader( provider.as_ref(), id, key, flight_id, tx).await,
            Role::Follower( mut rx) => {
                match rx.recv().await {
                    Ok(Ok(data)) => Ok(data),
                    Ok(Err(msg)) => Err( OdinLiveWpError::FetchError(msg)),
                    Err(_) => Err( OdinLiveWpError::FetchError( format!("upstream request for {key} was aborted")))
                }
            }
        }
    }

    async fn fetch_as_leader (&self, provider: &dyn LiveWaypointProvider, id: &LiveWaypointId, key: String,
                              flight_id: u64, tx: broadcast::Sender<FlightResult>)->Result<LiveWaypointData>
    {
        // removes our in-flight entry if this future gets dropped before completion
        let mut flight_guard = InFlightGuard { state: &self.state, key: key.as_str(), flight_id, done: false };

        debug!("fetching {} from upstream", key);
        let res = provider.fetch( id).await;

        let mut guard = self.lock_state();
        let st = &mut *guard;
        if st.in_flight.get( &key).map( |f| f.flight_id == flight_id).unwrap_or(false) {
            st.in_flight.remove( &key);
        }
        flight_guard.done = true;

        match res {
            Ok(record) => {
                let now = self.clock.now();
                st.entries.insert( key.clone(), CacheEntry { record: record.clone(), fetched_at: now });
                self.evict( st, now);

                let data = LiveWaypointData { record, next_request_date: provider.next_request_date( id, now) };
                let _ = tx.send( Ok(data.clone())); // no followers is not an error
                Ok(data)
            }
            Err(e) => {
                st.stats.fetch_failures += 1;
                warn!("fetching {} failed: {}", key, e);
                let _ = tx.send( Err(e.to_string()));
                Err(e)
            }
        }
    }

    /// drop entries older than the configured max age and, if we still have too many, the least recently fetched ones.
    /// Entries fetched within the min interval of their provider are pinned (their ids are still blocked for
    /// upstream requests). Polling states of providers are pruned accordingly, also never within their min interval
    fn evict (&self, st: &mut CacheState, now: DateTime<Utc>) {
        let cutoff = now.checked_sub_signed( time_delta( self.config.max_age)).unwrap_or( DateTime::<Utc>::MIN_UTC);
        let n_before = st.entries.len();

        let min_interval_cutoffs: HashMap<ProviderType,DateTime<Utc>> = self.providers.iter().map( |(pt,p)| {
            let c = now.checked_sub_signed( time_delta( p.polling_state().min_interval())).unwrap_or( DateTime::<Utc>::MIN_UTC);
            (*pt, c)
        }).collect();
        let is_pinned = |e: &CacheEntry| {
            min_interval_cutoffs.get( &e.record.id.provider_type()).map( |c| e.fetched_at > *c).unwrap_or(false)
        };

        st.entries.retain( |_,e| e.fetched_at >= cutoff || is_pinned(e));

        if st.entries.len() > self.config.max_entries {
            let mut by_age: Vec<(DateTime<Utc>,String)> = st.entries.iter()
                .filter( |(_,e)| !is_pinned(*e))
                .map( |(k,e)| (e.fetched_at, k.clone()))
                .collect();
            by_age.sort();
            let n_excess = st.entries.len() - self.config.max_entries;
            for (_,k) in by_age.into_iter().take( n_excess) {
                st.entries.remove( &k);
            }
            if st.entries.len() > self.config.max_entries {
                debug!("{} live waypoint entries exceed max_entries but are still within their min interval", st.entries.len());
            }
        }

        let n_evicted = n_before - st.entries.len();
        if n_evicted > 0 {
            debug!("evicted {} live waypoint entries", n_evicted);
        }

        for (pt,provider) in self.providers.iter() {
            let min_interval_cutoff = min_interval_cutoffs.get( pt).copied().unwrap_or( DateTime::<Utc>::MIN_UTC);
            provider.prune_polling_state( cutoff.min( min_interval_cutoff));
        }
    }

    /// the cached record for `id` (if any), without any provider interaction
    pub fn cached_record (&self, id: &LiveWaypointId)->Option<LiveWaypointRecord> {
        self.lock_state().entries.get( &id.to_string()).map( |e| e.record.clone())
    }

    pub fn len (&self)->usize { self.lock_state().entries.len() }

    pub fn is_empty (&self)->bool { self.lock_state().entries.is_empty() }

    pub fn in_flight_count (&self)->usize { self.lock_state().in_flight.len() }

    pub fn stats (&self)->CacheStats { self.lock_state().stats }

    pub fn log_stats (&self) {
        let stats = self.stats();
        info!("live waypoint cache: {} entries, {} requests, {} upstream fetches ({} failed), {} cache hits, {} coalesced",
            self.len(), stats.requests, stats.upstream_fetches, stats.fetch_failures, stats.cache_hits, stats.coalesced);
    }
}

struct InFlightGuard<'a> {
    state: &'a Mutex<CacheState>,
    key: &'a str,
    flight_id: u64,
    done: bool,
}

impl<'a> Drop for InFlightGuard<'a> {
    fn drop (&mut self) {
        if !self.done {
            let mut st = self.state.lock().unwrap_or_else( PoisonError::into_inner);
            if st.in_flight.get( self.key).map( |f| f.flight_id == self.flight_id).unwrap_or(false) {
                st.in_flight.remove( self.key); // drops the sender, followers get a closed channel
            }
        }
    }
}
