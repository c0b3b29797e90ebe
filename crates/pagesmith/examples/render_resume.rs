//! Renders a sample resume at each requested page count and writes the
//! resulting PDFs next to the working directory.
//!
//! ```sh
//! cargo run --example render_resume
//! ```

use pagesmith::{Engine, EngineConfig, RenderOptions, ResumeDocument};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let doc: ResumeDocument = serde_json::from_str(SAMPLE)?;
    let engine = Engine::new(EngineConfig::default())?;

    for requested in [1, 2, 0] {
        let options = RenderOptions {
            requested_page_count: requested,
            filename: Some(format!("resume-{requested}p.pdf")),
        };
        let out = engine.render(&doc, &options).await;
        let path = options.filename.clone().unwrap_or_default();
        std::fs::write(&path, &out.bytes)?;
        info!(
            requested,
            mode = %out.mode_used,
            pages = out.page_count,
            bytes = out.bytes.len(),
            %path,
            "rendered"
        );

        let assessment = engine.assess(&doc, &options).await;
        for issue in &assessment.issues {
            info!(code = ?issue.code, message = %issue.message, "finding");
        }
    }

    Ok(())
}

const SAMPLE: &str = r#"{
  "name": "Ada Lovelace",
  "headline": "Principal Engineer - Compilers & Analytical Machinery",
  "email": "ada@example.com",
  "phone": "+44 20 5550 0100",
  "location": "London, UK",
  "links": ["github.com/ada", "ada.dev"],
  "summary": "Engineer working on compilers, distributed storage, and developer tooling with a focus on correctness, performance, and the craft of writing software that other engineers can maintain over the long term.",
  "skills": [
    {"category": "Languages", "items": ["Rust", "Python", "Ada", "C++"]},
    {"category": "Systems", "items": ["PostgreSQL", "Kafka", "Kubernetes"]}
  ],
  "experience": [
    {
      "company": "Analytical Engines",
      "role": "Principal Engineer",
      "dates": "2019 - Present",
      "location": "Remote",
      "achievements": [
        "Led the multi-year replatforming of the monolith onto service-oriented infrastructure across four product teams with zero downtime",
        "Cut p99 request latency by 40% by introducing a distributed caching layer with consistent hashing",
        "Built the deterministic build pipeline that reduced release lead time from two weeks to one day",
        "Mentored eleven engineers through promotion cases and staffed two new teams from scratch"
      ]
    },
    {
      "company": "Difference Works",
      "role": "Senior Engineer",
      "dates": "2015 - 2019",
      "location": "London",
      "achievements": [
        "Designed the carry-propagation engine used in every subsequent product line",
        "Shipped the first automated regression harness, catching 30% of defects before release"
      ]
    }
  ],
  "projects": [
    {
      "name": "Notes on the Analytical Engine",
      "description": "Annotated translation with the first published algorithm",
      "impact": "Still cited two centuries later"
    },
    {
      "name": "Bernoulli Generator",
      "bullets": ["Computes Bernoulli numbers on punched cards with bounded memory"]
    }
  ],
  "education": {
    "institution": "Private tuition, London",
    "degree": "Mathematics",
    "dates": "1828 - 1835"
  },
  "certifications": ["Royal Society correspondence prize"]
}"#;
