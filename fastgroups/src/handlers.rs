use crate::commands::Commands;
use crate::output::{print_groups, print_info, print_slots};
use fastgroups_core::{
    ControllerError, ModeVariant, RemoteGroupController, INITIAL_REFRESH_DELAY, MUTER,
    REFRESH_DEBOUNCE,
};
use graph::{GraphDefinition, GraphError, MemoryHost};
use lifecycle::{InProcessBus, LifecycleEvent};
use std::path::Path;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("controller error: {0}")]
    Controller(#[from] ControllerError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown variant '{0}', expected muter or bypasser")]
    UnknownVariant(String),
}

/// A loaded graph with its controllers attached and reconciled.
struct Session {
    bus: InProcessBus,
    host: MemoryHost,
    controllers: Vec<RemoteGroupController>,
    clock: Duration,
}

impl Session {
    fn load(path: &Path, variant_override: Option<&str>) -> Result<Self, CliError> {
        let definition = GraphDefinition::load_from_file(path)?;
        let mut bus = InProcessBus::new();
        let mut controllers = Vec::with_capacity(definition.controllers.len());
        for entry in &definition.controllers {
            let variant = match variant_override.or(entry.variant.as_deref()) {
                Some(name) => ModeVariant::from_name(name)
                    .ok_or_else(|| CliError::UnknownVariant(name.to_string()))?,
                None => MUTER,
            };
            let mut controller = RemoteGroupController::new(entry.id, variant, &mut bus);
            for (key, value) in &entry.properties {
                controller.set_property(key, value.clone(), Duration::ZERO);
            }
            controller.on_added(definition.current_graph, Duration::ZERO);
            controllers.push(controller);
        }
        let mut session = Self {
            bus,
            host: MemoryHost::new(definition),
            controllers,
            clock: Duration::ZERO,
        };
        session.settle();
        session.wire();
        Ok(session)
    }

    /// Advances the clock past the attach delay and the debounce.
    fn settle(&mut self) {
        for step in [INITIAL_REFRESH_DELAY, REFRESH_DEBOUNCE] {
            self.clock += step;
            for controller in &mut self.controllers {
                controller.poll_timers(self.clock, &mut self.host);
            }
        }
    }

    fn wire(&mut self) {
        let links = self.host.graph().links.clone();
        for controller in &mut self.controllers {
            let id = controller.id();
            for link in links.iter().filter(|link| link.to_node == id) {
                if let Err(err) = controller.connect_input(&link.to_input, link.id) {
                    log::warn!("link {} not wired: {err}", link.id);
                }
            }
        }
    }

    fn emit(&mut self, event: LifecycleEvent) -> Result<(), CliError> {
        self.bus.emit(event);
        for controller in &mut self.controllers {
            controller.process_events(&mut self.host)?;
        }
        Ok(())
    }

    fn submit(&mut self) -> Result<(), CliError> {
        self.emit(LifecycleEvent::QueueStart)?;
        self.host.capture_snapshot();
        self.emit(LifecycleEvent::SerializationStart)?;
        self.emit(LifecycleEvent::SerializationEnd)?;
        self.emit(LifecycleEvent::QueueEnd)?;
        self.host.clear_snapshot();
        Ok(())
    }
}

pub fn handle_command(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Slots {
            graph,
            variant,
            json,
        } => handle_slots(&graph, variant.as_deref(), json),
        Commands::Simulate {
            graph,
            variant,
            output,
        } => handle_simulate(&graph, variant.as_deref(), output.as_deref()),
    }
}

fn handle_slots(path: &Path, variant: Option<&str>, json: bool) -> Result<(), CliError> {
    let session = Session::load(path, variant)?;
    if json {
        let summary: Vec<serde_json::Value> = session
            .controllers
            .iter()
            .map(|controller| {
                serde_json::json!({
                    "id": controller.id(),
                    "variant": controller.variant().name,
                    "inputs": controller.inputs(),
                    "outputs": controller.outputs(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    if session.controllers.is_empty() {
        print_info("No controllers in graph");
    }
    for controller in &session.controllers {
        print_slots(controller);
    }
    Ok(())
}

fn handle_simulate(
    path: &Path,
    variant: Option<&str>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let mut session = Session::load(path, variant)?;
    session.submit()?;
    print_groups(&session.host);
    if let Some(output) = output {
        session.host.graph().save_to_file(output)?;
        print_info(&format!("Graph written to {}", output.display()));
    }
    Ok(())
}
