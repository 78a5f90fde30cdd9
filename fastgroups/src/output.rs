use fastgroups_core::RemoteGroupController;
use graph::{GroupProvider, MemoryHost, SortMode};

pub fn print_info(message: &str) {
    println!("[FastGroups][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[FastGroups][ERROR]: {message}");
}

pub fn print_slots(controller: &RemoteGroupController) {
    print_info(&format!(
        "{} - {}",
        controller.id(),
        controller.variant().name
    ));
    if controller.inputs().is_empty() {
        println!("\t(no inputs)");
    }
    for (index, input) in controller.inputs().iter().enumerate() {
        match input.link {
            Some(link) => println!("\t{index}: {} [{}] <- link {link}", input.name, input.kind),
            None => println!("\t{index}: {} [{}]", input.name, input.kind),
        }
    }
    for output in controller.outputs() {
        println!("\tout: {} [{}]", output.name, output.kind);
    }
}

pub fn print_groups(host: &MemoryHost) {
    print_info("Groups:");
    for group in host.groups(SortMode::Position) {
        let state = if host.group_active(&group.title) {
            "active"
        } else {
            "inactive"
        };
        let members: Vec<String> = host
            .graph()
            .group_members(&group.title)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| host.node_mode(id).map(|mode| format!("{id}={}", mode.label())))
            .collect();
        println!("{} ({state}): {}", group.title, members.join(", "));
    }
}
