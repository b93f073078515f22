//! Orchestrator - builds the uninhabited-planets list and the enriched Echo
//! Base document from local fixtures and SWAPI lookups.
//!
//! Every step runs in order and the first failure aborts the run; no partial
//! output is written.

use crate::config::EchoConfig;
use crate::document::{get, get_entity, read_json, set, write_json};
use crate::entity::{Entity, EntityKind};
use crate::error::{EchoError, Result};
use crate::evacuation::{add_assignment, transport_assignment, update_plan};
use crate::fetcher::ResourceFetcher;
use crate::normalizer::Normalizer;
use crate::transform::{assign_crew, combine_data, crew, is_unknown};
use serde_json::Value;
use tracing::{debug, info};

const HOTH: &str = "/location/planet";
const COMMANDER: &str = "/garrison/commander";
const PERSONNEL: &str = "/garrison/personnel";
const FALCON: &str = "/visiting_starships/freighters/0";
const SMUGGLER: &str = "/visiting_starships/freighters/1/pilot";
const SNOWSPEEDER: &str = "/vehicle_assets/snowspeeders/0/type";
const XWING: &str = "/starship_assets/starfighters/0/type";
const TRANSPORT: &str = "/starship_assets/transports/0/type";
const TRANSPORTS_AVAILABLE: &str = "/starship_assets/transports/0/num_available";
const EVACUATION_PLAN: &str = "/evacuation_plan";

const EVACUATION_TRANSPORT_NAME: &str = "Bright Hope";

/// Counts reported after a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub uninhabited_planets: usize,
    pub transport_assignments: usize,
}

/// Planets whose population is unknown, filtered to the planet keys and cleaned.
pub async fn uninhabited_planets<F>(normalizer: &Normalizer<'_, F>, planets: &Value) -> Result<Vec<Entity>>
where
    F: ResourceFetcher + ?Sized,
{
    let planets = planets.as_array().ok_or_else(|| EchoError::InvalidField {
        field: "planets".to_string(),
        reason: "expected a list of planets".to_string(),
    })?;

    let mut uninhabited = Vec::new();
    for (index, planet) in planets.iter().enumerate() {
        let planet = planet.as_object().ok_or_else(|| EchoError::InvalidField {
            field: format!("planets[{}]", index),
            reason: "expected a planet object".to_string(),
        })?;

        let population_unknown = planet
            .get("population")
            .and_then(Value::as_str)
            .map_or(false, is_unknown);

        if population_unknown {
            uninhabited.push(normalizer.clean(planet, Some(EntityKind::Planet)).await?);
        } else {
            let name = planet.get("name").unwrap_or(&Value::Null);
            debug!("Skipping inhabited planet {}", name);
        }
    }

    Ok(uninhabited)
}

pub struct EchoBasePipeline<F> {
    fetcher: F,
    base_capacity: i64,
}

impl<F: ResourceFetcher> EchoBasePipeline<F> {
    pub fn new(fetcher: F, base_capacity: i64) -> Self {
        Self {
            fetcher,
            base_capacity,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn normalizer(&self) -> Normalizer<'_, F> {
        Normalizer::new(&self.fetcher)
    }

    /// Read both input documents, build both outputs and write them.
    pub async fn run(&self, config: &EchoConfig) -> Result<RunSummary> {
        info!("Reading planets from {}", config.planets_input.display());
        let planets = read_json(&config.planets_input)?;
        let uninhabited = uninhabited_planets(&self.normalizer(), &planets).await?;
        info!("Found {} uninhabited planets", uninhabited.len());

        info!("Reading Echo Base from {}", config.echo_input.display());
        let echo_base = read_json(&config.echo_input)?;
        let echo_base = self.build_echo_base(echo_base).await?;

        let transport_assignments = get(&echo_base, "/evacuation_plan/transport_assignments")?
            .as_array()
            .map_or(0, Vec::len);

        write_json(
            &config.planets_output,
            &Value::Array(uninhabited.iter().cloned().map(Value::Object).collect()),
        )?;
        info!("Wrote {}", config.planets_output.display());

        write_json(&config.echo_output, &echo_base)?;
        info!("Wrote {}", config.echo_output.display());

        Ok(RunSummary {
            uninhabited_planets: uninhabited.len(),
            transport_assignments,
        })
    }

    /// Resolve and normalize every entity of the Echo Base scenario and
    /// populate its evacuation plan.
    pub async fn build_echo_base(&self, mut echo_base: Value) -> Result<Value> {
        info!("Updating Hoth");
        self.merge_with_swapi(&mut echo_base, HOTH, "planets", "hoth", EntityKind::HothPlanet)
            .await?;

        info!("Cleaning garrison commander and visiting smuggler");
        self.clean_at(&mut echo_base, COMMANDER, EntityKind::Person).await?;
        self.clean_at(&mut echo_base, SMUGGLER, EntityKind::Person).await?;

        info!("Updating vehicles and starships");
        self.merge_with_swapi(&mut echo_base, SNOWSPEEDER, "vehicles", "snowspeeder", EntityKind::Vehicle)
            .await?;
        self.merge_with_swapi(&mut echo_base, XWING, "starships", "t-65 x-wing", EntityKind::Starship)
            .await?;
        self.merge_with_swapi(&mut echo_base, TRANSPORT, "starships", "gr-75 medium transport", EntityKind::Starship)
            .await?;
        self.merge_with_swapi(&mut echo_base, FALCON, "starships", "millennium falcon", EntityKind::Starship)
            .await?;

        info!("Assigning Millennium Falcon crew");
        let falcon = get_entity(&echo_base, FALCON)?;
        let falcon_crew = crew([
            ("pilot", self.person("han solo").await?),
            ("copilot", self.person("chewbacca").await?),
        ]);
        set(&mut echo_base, FALCON, Value::Object(assign_crew(&falcon, &falcon_crew)))?;

        info!("Updating evacuation plan");
        self.plan_evacuation(&mut echo_base).await?;

        Ok(echo_base)
    }

    async fn plan_evacuation(&self, echo_base: &mut Value) -> Result<()> {
        let mut plan = get_entity(echo_base, EVACUATION_PLAN)?;
        let personnel = get_entity(echo_base, PERSONNEL)?;
        let available = get(echo_base, TRANSPORTS_AVAILABLE)?.clone();

        update_plan(&mut plan, &personnel, &available, self.base_capacity)?;

        let transport = get_entity(echo_base, TRANSPORT)?;
        let xwing = get_entity(echo_base, XWING)?;

        let passengers = vec![self.person("leia organa").await?, self.person("c-3po").await?];

        let luke_crew = crew([
            ("pilot", self.person("luke skywalker").await?),
            ("astromech_droid", self.person("r2-d2").await?),
        ]);
        let wedge_crew = crew([
            ("pilot", self.person("wedge antilles").await?),
            ("astromech_droid", self.person("r5-d4").await?),
        ]);
        let escorts = vec![assign_crew(&xwing, &luke_crew), assign_crew(&xwing, &wedge_crew)];

        let assignment = transport_assignment(&transport, EVACUATION_TRANSPORT_NAME, passengers, escorts);
        add_assignment(&mut plan, assignment)?;

        set(echo_base, EVACUATION_PLAN, Value::Object(plan))
    }

    /// Merge the local record at `pointer` with the first SWAPI search hit
    /// (SWAPI values win), then filter and clean it as `kind`.
    async fn merge_with_swapi(
        &self,
        echo_base: &mut Value,
        pointer: &str,
        resource: &str,
        term: &str,
        kind: EntityKind,
    ) -> Result<()> {
        let local = get_entity(echo_base, pointer)?;
        let swapi = self.fetcher.search_first(resource, term).await?;
        debug!("Merging SWAPI {} '{}' into {}", resource, term, pointer);

        let merged = combine_data(&local, &swapi);
        let cleaned = self.normalizer().clean(&merged, Some(kind)).await?;
        set(echo_base, pointer, Value::Object(cleaned))
    }

    async fn clean_at(&self, echo_base: &mut Value, pointer: &str, kind: EntityKind) -> Result<()> {
        let entity = get_entity(echo_base, pointer)?;
        let cleaned = self.normalizer().clean(&entity, Some(kind)).await?;
        set(echo_base, pointer, Value::Object(cleaned))
    }

    /// Search SWAPI people and clean the first hit.
    pub async fn person(&self, term: &str) -> Result<Entity> {
        let person = self.fetcher.search_first("people", term).await?;
        self.normalizer().clean(&person, Some(EntityKind::Person)).await
    }

    /// Search `resource` and clean the first hit, filtered to `kind` when given.
    pub async fn lookup(&self, resource: &str, term: &str, kind: Option<EntityKind>) -> Result<Entity> {
        let record = self.fetcher.search_first(resource, term).await?;
        self.normalizer().clean(&record, kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::FixtureFetcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_uninhabited_planets_keeps_unknown_population() {
        let fetcher = FixtureFetcher::default();
        let normalizer = Normalizer::new(&fetcher);

        let planets = json!([
            {"name": "Hoth", "population": "unknown", "diameter": "7200", "residents": [], "url": "https://swapi.test/api/planets/4/"},
            {"name": "Tatooine", "population": "200000", "diameter": "10465"},
            {"name": "Dagobah", "population": "unknown", "climate": "murky", "terrain": "swamp, jungles"},
            {"name": "Bespin", "population": 6000000}
        ]);

        let uninhabited = uninhabited_planets(&normalizer, &planets).await.unwrap();
        assert_eq!(uninhabited.len(), 2);
        assert_eq!(
            Value::Object(uninhabited[0].clone()),
            json!({"url": "https://swapi.test/api/planets/4/", "name": "Hoth", "diameter": 7200, "population": null})
        );
        assert_eq!(uninhabited[1]["terrain"], json!(["swamp", "jungles"]));
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn test_uninhabited_planets_needs_a_list() {
        let fetcher = FixtureFetcher::default();
        let normalizer = Normalizer::new(&fetcher);
        assert!(uninhabited_planets(&normalizer, &json!({"name": "Hoth"})).await.is_err());
    }

    #[tokio::test]
    async fn test_uninhabited_planets_rejects_non_object_entry() {
        let fetcher = FixtureFetcher::default();
        let normalizer = Normalizer::new(&fetcher);

        let planets = json!([{"name": "Hoth", "population": "unknown"}, "Dagobah"]);
        let err = uninhabited_planets(&normalizer, &planets).await.unwrap_err();
        assert!(matches!(err, EchoError::InvalidField { ref field, .. } if field == "planets[1]"));
    }

    #[tokio::test]
    async fn test_lookup_cleans_search_hit() {
        let fetcher = FixtureFetcher::default().with_search(
            "starships",
            "millennium falcon",
            json!({
                "name": "Millennium Falcon",
                "starship_class": "Light freighter",
                "length": "34.37",
                "crew": "4",
                "passengers": "6",
                "hyperdrive_rating": "0.5",
                "pilots": []
            }),
        );
        let pipeline = EchoBasePipeline::new(fetcher, 90);

        let falcon = pipeline
            .lookup("starships", "millennium falcon", Some(EntityKind::Starship))
            .await
            .unwrap();
        assert_eq!(falcon["length"], json!(34.37));
        assert_eq!(falcon["crew"], json!(4));
        assert!(!falcon.contains_key("pilots"));
    }

    #[tokio::test]
    async fn test_missing_fixture_path_aborts() {
        let pipeline = EchoBasePipeline::new(FixtureFetcher::default(), 90);
        let err = pipeline.build_echo_base(json!({"garrison": {}})).await.unwrap_err();
        assert!(matches!(err, EchoError::MissingPath(ref p) if p == "/location/planet"));
    }
}
