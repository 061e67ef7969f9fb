use clap::Parser;
use nodegraph::nodes::{output, perlin_noise};
use nodegraph::prelude::*;
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Interactive shell over a node graph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional path to a graph config JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<String>,

    /// Start without the default Perlin Noise -> Output scene
    #[arg(long)]
    empty: bool,
}

enum Flow {
    Continue,
    Quit,
}

const HELP: &str = "\
Commands (node ids are the numbers shown by `show`; quote type names with spaces):
  add <type> [x y]                      place a node
  connect <src> <output> <dst> <input>  wire an output to an input
  disconnect <src> <output> <dst> <input>
  set <id> <property> <value>           edit a property and propagate
  remove <id>                           remove one node
  select <id> | toggle <id>             replace / toggle the selection
  select-all | deselect-all
  move <dx> <dy>                        move the selected nodes
  delete                                remove the selected nodes
  layers <id>                           show the downstream depth layers
  show                                  list nodes and wires
  shader [id]                           print the fragment shader of an Output node
  types                                 list registered node types
  help | quit";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GraphConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => GraphConfig::default(),
    };
    let registry = NodeRegistry::builder()
        .with_builtin_node_types()
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to build registry: {}", e)));
    let mut graph = NodeGraph::with_config(Arc::new(registry), config);

    if !cli.empty {
        if let Err(e) = build_default_scene(&mut graph).await {
            exit_with_error(&format!("Failed to build the default scene: {}", e));
        }
    }

    match cli.script {
        Some(path) => {
            let script = fs::read_to_string(&path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read script '{}': {}", path, e))
            });
            for line in script.lines() {
                println!("> {}", line);
                if let Flow::Quit = execute_line(&mut graph, line).await {
                    break;
                }
            }
        }
        None => run_interactive(&mut graph).await,
    }
}

async fn build_default_scene(graph: &mut NodeGraph) -> CliResult<()> {
    let noise = graph.create_node(perlin_noise::NAME, 100.0, 100.0).await?;
    let sink = graph.create_node(output::NAME, 400.0, 100.0).await?;
    graph.connect_wire(noise, "pattern", sink, "diffuse")?;
    Ok(())
}

async fn run_interactive(graph: &mut NodeGraph) {
    println!("--- nodegraph interactive mode (type `help`) ---");
    let stdin = io::stdin();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if let Flow::Quit = execute_line(graph, &line).await {
            return;
        }
    }
}

async fn execute_line(graph: &mut NodeGraph, line: &str) -> Flow {
    let args = tokenize(line);
    if args.is_empty() || args[0].starts_with("//") {
        return Flow::Continue;
    }
    match run_command(graph, &args).await {
        Ok(flow) => flow,
        Err(e) => {
            println!("  error: {}", e);
            Flow::Continue
        }
    }
}

async fn run_command(graph: &mut NodeGraph, args: &[String]) -> CliResult<Flow> {
    match args[0].as_str() {
        "add" => {
            let type_name = arg(args, 1)?;
            let id = if args.len() >= 4 {
                graph
                    .create_node(type_name, arg(args, 2)?.parse()?, arg(args, 3)?.parse()?)
                    .await?
            } else {
                graph.add_node_at_default(type_name).await?
            };
            println!("  added {} {}", type_name, id);
        }
        "connect" => {
            let src = node_arg(graph, arg(args, 1)?)?;
            let dst = node_arg(graph, arg(args, 3)?)?;
            match graph.connect_wire(src, arg(args, 2)?, dst, arg(args, 4)?)? {
                WireOutcome::Connected { replaced: Some(prior) } => {
                    println!("  connected (replaced {})", prior)
                }
                WireOutcome::Connected { replaced: None } => println!("  connected"),
                WireOutcome::Rejected(reason) => println!("  ignored: {}", reason),
            }
        }
        "disconnect" => {
            let src = node_arg(graph, arg(args, 1)?)?;
            let dst = node_arg(graph, arg(args, 3)?)?;
            graph.disconnect_wire(src, arg(args, 2)?, dst, arg(args, 4)?)?;
            println!("  disconnected");
        }
        "set" => {
            let id = node_arg(graph, arg(args, 1)?)?;
            let raw = args.get(3..).map(|rest| rest.join(" ")).unwrap_or_default();
            if raw.is_empty() {
                return Err("`set` expects a value".into());
            }
            let value = Value::parse_input(&raw);
            let report = graph.set_final_property_value_and_propagate(id, arg(args, 2)?, value)?;
            println!("  recomputed {}", format_ids(&report.order));
        }
        "remove" => {
            let id = node_arg(graph, arg(args, 1)?)?;
            match graph.remove_node(id)? {
                Some(_) => println!("  removed {}", id),
                None => println!("  {} is protected", id),
            }
        }
        "select" => {
            let id = node_arg(graph, arg(args, 1)?)?;
            graph.replace_selection(id)?;
        }
        "toggle" => {
            let id = node_arg(graph, arg(args, 1)?)?;
            let selected = graph.toggle_node_selection(id)?;
            println!("  {} {}", id, if selected { "selected" } else { "deselected" });
        }
        "select-all" => graph.select_all(),
        "deselect-all" => graph.deselect_all(),
        "move" => {
            if !graph.move_selected(arg(args, 1)?.parse()?, arg(args, 2)?.parse()?) {
                println!("  nothing selected");
            }
        }
        "delete" => {
            let removed = graph.remove_selected()?;
            println!("  removed {}", format_ids(&removed));
        }
        "layers" => {
            let id = node_arg(graph, arg(args, 1)?)?;
            let layers = find_downstream_depth_layers(graph, id)?;
            if layers.is_empty() {
                println!("  nothing downstream of {}", id);
            }
            for (depth, layer) in layers.iter().enumerate() {
                let ids: Vec<NodeId> = layer.iter().copied().collect();
                println!("  depth {}: {}", depth + 1, format_ids(&ids));
            }
        }
        "show" => show(graph)?,
        "shader" => {
            let id = match args.get(1) {
                Some(raw) => node_arg(graph, raw)?,
                None => graph
                    .node_ids()
                    .into_iter()
                    .find(|&id| graph.node(id).is_ok_and(|n| n.type_name() == output::NAME))
                    .ok_or("the graph has no Output node")?,
            };
            println!("{}", output::fragment_shader(graph, id)?);
        }
        "types" => {
            for name in graph.registry().type_names() {
                println!("  {}", name);
            }
        }
        "help" => println!("{}", HELP),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => return Err(format!("unknown command `{}` (see `help`)", other).into()),
    }
    Ok(Flow::Continue)
}

fn show(graph: &NodeGraph) -> CliResult<()> {
    for id in graph.node_ids() {
        let node = graph.node(id)?;
        let position = node.position();
        println!(
            "  {} {}{} at ({}, {})",
            id,
            node.type_name(),
            if node.is_selected() { " [selected]" } else { "" },
            position.x,
            position.y
        );
        for property in &graph.registry().definition(node.type_name())?.properties {
            let value = match property.direction {
                Direction::In => graph.get_in_property_value(id, &property.identifier)?,
                Direction::Out => graph.get_out_property_value(id, &property.identifier)?,
            };
            let shown = value.map_or("-".to_string(), Value::to_string);
            println!(
                "      {:>3} {} = {}",
                property.direction.to_string(),
                property.identifier,
                shown
            );
        }
    }
    for edge in graph.edges() {
        println!("  wire {}", edge);
    }
    Ok(())
}

fn arg(args: &[String], i: usize) -> CliResult<&str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("`{}` expects more arguments (see `help`)", args[0]).into())
}

/// Resolves `3` or `#3` to the handle of a live node.
fn node_arg(graph: &NodeGraph, raw: &str) -> CliResult<NodeId> {
    let index: u32 = raw.trim_start_matches('#').parse()?;
    graph
        .node_ids()
        .into_iter()
        .find(|id| id.index() == index)
        .ok_or_else(|| format!("no node #{}", index).into())
}

fn format_ids(ids: &[NodeId]) -> String {
    if ids.is_empty() {
        return "nothing".to_string();
    }
    ids.iter().map(NodeId::to_string).collect::<Vec<_>>().join(", ")
}

/// Splits on whitespace, keeping double-quoted runs together.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in line.trim().chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
