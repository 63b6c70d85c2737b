use serde::Serialize;
use thiserror::Error;

/// Length of the sample roadmap in months.
pub const DEFAULT_HORIZON: u32 = 24;

pub const ROLLOFF_ACTIVITIES: &str =
    "Rolloff period: Ongoing support, transition, and service ramp-down activities.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PhaseError {
    #[error("Phase '{name}' must start before it ends (months {start}..{end})")]
    EmptyRange { name: String, start: u32, end: u32 },
    #[error("Phase '{name}' ends at month {end}, past the {horizon}-month horizon")]
    BeyondHorizon { name: String, end: u32, horizon: u32 },
}

/// A named interval on the roadmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub activities: String,
    pub has_rolloff: bool,
}

impl Phase {
    pub fn new(name: &str, start: u32, end: u32, activities: &str) -> Self {
        Self {
            name: name.to_string(),
            start,
            end,
            activities: activities.to_string(),
            has_rolloff: false,
        }
    }

    pub fn with_rolloff(mut self) -> Self {
        self.has_rolloff = true;
        self
    }
}

/// One bar on the chart. Serialises to the `{x, y, activities, isRolloff}`
/// points the bar chart expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    #[serde(rename = "x")]
    pub range: [u32; 2],
    #[serde(rename = "y")]
    pub label: String,
    pub activities: String,
    #[serde(rename = "isRolloff")]
    pub is_rolloff: bool,
}

impl Segment {
    pub fn start(&self) -> u32 {
        self.range[0]
    }

    pub fn end(&self) -> u32 {
        self.range[1]
    }

    pub fn duration_months(&self) -> u32 {
        self.end().saturating_sub(self.start())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    horizon: u32,
    phases: Vec<Phase>,
}

impl Timeline {
    pub fn new(horizon: u32, phases: Vec<Phase>) -> Result<Self, PhaseError> {
        for phase in &phases {
            if phase.start >= phase.end {
                return Err(PhaseError::EmptyRange {
                    name: phase.name.clone(),
                    start: phase.start,
                    end: phase.end,
                });
            }
            if phase.end > horizon {
                return Err(PhaseError::BeyondHorizon {
                    name: phase.name.clone(),
                    end: phase.end,
                    horizon,
                });
            }
        }
        Ok(Self { horizon, phases })
    }

    /// The cloud adoption roadmap shown on the page.
    pub fn cloud_adoption() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            phases: vec![
                Phase::new(
                    "Mobilize",
                    0,
                    2,
                    "Project kick-off, UNN LZ Design & Build, Initial Assessments",
                ),
                Phase::new(
                    "Infrastructure as a Service (IaaS)",
                    2,
                    5,
                    "Foundational IaaS services, Pilot migration to UNN, First CSP PLZ Build, Pilot to CSP",
                )
                .with_rolloff(),
                Phase::new(
                    "Migration",
                    5,
                    9,
                    "App portfolio assessment, Wave migrations, Modernization efforts",
                )
                .with_rolloff(),
                Phase::new(
                    "Data Storage",
                    9,
                    15,
                    "Data landscape assessment, CSP Data Storage Implementation",
                )
                .with_rolloff(),
                Phase::new(
                    "Disaster Recovery as a Service (DRaaS)",
                    15,
                    18,
                    "BIA, RTO/RPO, DRaaS implementation & testing",
                )
                .with_rolloff(),
                Phase::new(
                    "Optimization",
                    18,
                    24,
                    "Continuous monitoring, cost/security/performance optimization",
                ),
            ],
        }
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Primary segment per phase, each followed by its rolloff segment when
    /// the phase has one and ends before the horizon.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(self.phases.len() * 2);
        for phase in &self.phases {
            segments.push(Segment {
                range: [phase.start, phase.end],
                label: phase.name.clone(),
                activities: phase.activities.clone(),
                is_rolloff: false,
            });
            if phase.has_rolloff && phase.end < self.horizon {
                segments.push(Segment {
                    range: [phase.end, self.horizon],
                    label: phase.name.clone(),
                    activities: ROLLOFF_ACTIVITIES.to_string(),
                    is_rolloff: true,
                });
            }
        }
        segments
    }
}
