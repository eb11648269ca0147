#![allow(dead_code)]

use anyhow::{bail, Result};
use energyvis::app_state::AppState;
use energyvis::config::config::Config;
use energyvis::data::data_source::DataSource;
use energyvis::data::dataset_cache::DatasetCache;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const CATALOG_CSV: &str = "\
image,Title,Author,Publication Title,Publication Year,URL,identify,monitor,analyse,VR,bar_charts,physics,engineering
p1,Grid Atlas,Smith,IEEE VIS,2020,https://example.org/p1,mapped,single,exploration,yes,no,yes,no
p2,Flow Lines,Jones,EuroVis,2021,https://example.org/p2,abstract,multiple,navigation,no,yes,no,yes
p3,Substation Views,Lee,CGF,2019,https://example.org/p3,mapped,multiple,passive,yes,yes,no,yes
p4,Untasked Paper,Kim,TVCG,2022,https://example.org/p4,distorted,single,passive,no,no,no,no
";

/// The two-row dataset used throughout the task viewer scenarios
pub const SMALL_TASKS_CSV: &str = "task_ID,paper_ID,Archetype\n1,P1,A\n2,P2,B\n";

pub const LITERATURE_CSV: &str = "\
task_ID,paper_ID,User Task,\"Task Type (network, geospatial, temporal, neither, all)\",Rule,Archetype,Why L1 Action,Why L2 Action,What Cat.,What Subcat.,Colour,Shape
1,p1,Locate overloaded lines,network,R1,Overview,discover,explore,Network,Topology,TRUE,
2,p1,Compare regional demand,geospatial,R2,Comparison,present,lookup,Spatial,Region,0,Maybe
3,p2,Trace power flow,network,R1,Overview,discover,locate,Network,Flow,1,FALSE
4,p3,Monitor substation state,temporal,R3,Monitoring,present,browse,Temporal,Series,,true
";

pub const FIELD_CSV: &str = "\
task_ID,paper_ID,User Task,\"Task Type (network, geospatial, temporal, neither, all)\",Archetype,Why L1 Action
F1,,Check outage reports,network,Monitoring,discover
F2,,Plan maintenance window,temporal,Planning,present
";

/// In-memory files; anything missing answers like a 404
#[derive(Default, Clone)]
pub struct MemorySource {
    files: HashMap<String, String>,
    fetches: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, contents: &str) -> Self {
        self.files.insert(name.to_string(), contents.to_string());
        self
    }

    /// Shared counter of every fetch issued against this source
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.fetches)
    }
}

impl DataSource for MemorySource {
    fn fetch_text(&self, name: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.files.get(name) {
            Some(text) => Ok(text.clone()),
            None => bail!("HTTP error! status: 404"),
        }
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

pub fn full_source() -> MemorySource {
    MemorySource::new()
        .with_file("energynetworks.csv", CATALOG_CSV)
        .with_file("literature_tasks.csv", LITERATURE_CSV)
        .with_file("field_tasks.csv", FIELD_CSV)
}

pub fn state_with(source: MemorySource) -> AppState {
    AppState::new(Config::default(), Box::new(source))
}

pub fn cache_with(source: MemorySource) -> DatasetCache {
    DatasetCache::new(Box::new(source), Config::default().data)
}
