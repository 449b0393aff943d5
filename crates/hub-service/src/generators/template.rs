use async_trait::async_trait;
use hub_core::{DomainError, RoadmapGenerator, RoadmapLevel, RoadmapSpec, RoadmapStep};

/// Phases a plan moves through, spread evenly over its weeks
const PHASES: [(&str, &str); 5] = [
    ("Foundations", "Set up the toolchain and learn the vocabulary of"),
    ("Core concepts", "Work through the central ideas of"),
    ("Practice", "Solve focused exercises in"),
    ("Project", "Build a small end-to-end project with"),
    ("Review", "Revisit weak spots and summarize what you learned about"),
];

/// Offline generator producing one step per week from a fixed template
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateRoadmapGenerator;

impl TemplateRoadmapGenerator {
    pub fn new() -> Self {
        Self
    }

    fn pace(level: RoadmapLevel) -> &'static str {
        match level {
            RoadmapLevel::Beginner => "Go slowly and take notes.",
            RoadmapLevel::Intermediate => "Skim what you know and dig into the gaps.",
            RoadmapLevel::Advanced => "Focus on internals and edge cases.",
        }
    }

    fn step(spec: &RoadmapSpec, week: u32) -> RoadmapStep {
        let index = ((week - 1) as usize * PHASES.len()) / spec.weeks as usize;
        let (phase, action) = PHASES[index.min(PHASES.len() - 1)];

        let resources = if index == 0 {
            vec![format!("Official {} documentation", spec.topic)]
        } else {
            Vec::new()
        };

        RoadmapStep {
            order: week,
            title: format!("Week {week}: {phase}"),
            description: format!("{action} {}. {}", spec.topic, Self::pace(spec.level)),
            resources,
        }
    }
}

#[async_trait]
impl RoadmapGenerator for TemplateRoadmapGenerator {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, spec: &RoadmapSpec) -> Result<Vec<RoadmapStep>, DomainError> {
        if spec.weeks == 0 {
            return Err(DomainError::RoadmapGenerationFailed(
                "a roadmap needs at least one week".to_string(),
            ));
        }
        Ok((1..=spec.weeks).map(|week| Self::step(spec, week)).collect())
    }
}
