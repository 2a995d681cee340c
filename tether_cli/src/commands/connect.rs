use crate::cli::Cli;
use crate::commands::{CommandError, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::io::{self, Write};
use std::path::Path;
use tether_core::{
    format_size, Advance, ApiGateway, FieldDef, FieldKind, HttpGateway, Mode, ProviderRegistry,
    Rule, Step, Target, WizardError, WizardSession, CREDENTIAL_PLACEHOLDER,
};

/// Import settings prompted on the preview step. These are shared by all
/// providers and never appear in a provider's own field list.
const IMPORT_PROMPTS: &[(&str, &str, PromptKind)] = &[
    ("prefix", "Bucket prefix", PromptKind::Text),
    ("regex_filter", "File filter regex", PromptKind::Text),
    (
        "use_blob_urls",
        "Treat every object as a source file",
        PromptKind::Toggle,
    ),
    (
        "recursive_scan",
        "Scan the bucket recursively",
        PromptKind::Toggle,
    ),
];

#[derive(Clone, Copy)]
enum PromptKind {
    Text,
    Toggle,
}

enum Action {
    Next,
    Back,
    Edit,
    Test,
    Preview,
    Save,
    Quit,
}

pub async fn run(cli: &Cli, project: i64, preselect: Option<&str>, target: Target) -> Result<()> {
    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::create(&registry, project, target)?;
    if let Some(name) = preselect {
        session.select_provider(name)?;
    }
    drive(cli, &registry, &mut session).await
}

pub async fn run_edit(cli: &Cli, project: i64, storage_path: &Path, target: Target) -> Result<()> {
    let raw = std::fs::read_to_string(storage_path)?;
    let storage: Value = serde_json::from_str(&raw)?;

    let registry = ProviderRegistry::with_builtins();
    let mut session = WizardSession::edit(&registry, project, target, &storage)?;
    drive(cli, &registry, &mut session).await
}

async fn drive(
    cli: &Cli,
    registry: &ProviderRegistry,
    session: &mut WizardSession<'_>,
) -> Result<()> {
    let gateway = HttpGateway::new(&cli.base_url, cli.token.clone())?;

    println!();
    match session.mode() {
        Mode::Create => println!("{}", "Connect a new storage".bold().cyan()),
        Mode::Edit => println!(
            "{} {}",
            "Reconfigure storage".bold().cyan(),
            session.provider_name().bold()
        ),
    }

    loop {
        print_step_header(session);

        match session.step() {
            Step::SelectProvider => step_select(registry, session)?,
            Step::ConfigureConnection => step_configure(session)?,
            Step::Preview => step_import(session)?,
            Step::Review => step_review(session)?,
        }

        loop {
            match prompt_action(session)? {
                Action::Next => match session.next() {
                    Ok(Advance::Moved(_)) => break,
                    Ok(Advance::Submit) => {
                        if submit(session, &gateway).await? {
                            return Ok(());
                        }
                    }
                    Err(WizardError::Validation) => print_errors(session),
                    Err(e) => return Err(e.into()),
                },
                Action::Save => match session.next() {
                    Ok(Advance::Submit) => {
                        if submit(session, &gateway).await? {
                            return Ok(());
                        }
                    }
                    Ok(Advance::Moved(_)) => break,
                    Err(WizardError::Validation) => print_errors(session),
                    Err(e) => return Err(e.into()),
                },
                Action::Back => {
                    session.previous();
                    break;
                }
                Action::Edit => break,
                Action::Test => test_connection(session, &gateway).await?,
                Action::Preview => load_preview(session, &gateway).await?,
                Action::Quit => {
                    println!();
                    println!("{}", "Nothing was saved.".dimmed());
                    return Ok(());
                }
            }
        }
    }
}

fn print_step_header(session: &WizardSession<'_>) {
    println!();
    println!(
        "{} {}",
        format!("Step {}/{}:", session.position() + 1, session.steps().len())
            .bold()
            .cyan(),
        session.step().title().bold()
    );
    println!();
}

fn step_select(registry: &ProviderRegistry, session: &mut WizardSession<'_>) -> Result<()> {
    let providers: Vec<_> = registry.list().collect();
    for (i, p) in providers.iter().enumerate() {
        let marker = if p.name == session.provider_name() {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {} {}. {} {}",
            marker,
            i + 1,
            p.title.bold(),
            format!("({})", p.name).dimmed()
        );
        println!("       {}", p.description.dimmed());
    }
    println!();

    print!(
        "Select provider [1-{}] (Enter keeps '{}'): ",
        providers.len(),
        session.provider_name()
    );
    io::stdout().flush()?;
    let input = read_line()?;

    if input.is_empty() {
        return Ok(());
    }

    let name = match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= providers.len() => providers[n - 1].name.clone(),
        _ => input,
    };
    if let Err(e) = session.select_provider(&name) {
        println!("{} {}", "!".red().bold(), e);
    }
    Ok(())
}

fn step_configure(session: &mut WizardSession<'_>) -> Result<()> {
    let title = FieldDef::new(
        "title",
        FieldKind::Text,
        "Storage title",
        Rule::non_empty("Storage title is required"),
    )
    .required();
    prompt_field(session, &title)?;

    let provider = session.provider()?;
    for row in &provider.layout {
        for field in provider.row_fields(row) {
            if field.kind.is_message() {
                if let Some(content) = &field.content {
                    println!("  {}", content.dimmed());
                }
                continue;
            }
            prompt_field(session, field)?;
        }
    }
    Ok(())
}

fn step_import(session: &mut WizardSession<'_>) -> Result<()> {
    for (name, label, kind) in IMPORT_PROMPTS {
        let def = match kind {
            PromptKind::Text => FieldDef::new(*name, FieldKind::Text, *label, Rule::string()),
            PromptKind::Toggle => FieldDef::new(*name, FieldKind::Toggle, *label, Rule::Bool),
        };
        prompt_field(session, &def)?;
    }

    if let Some(files) = session.files_preview() {
        print_preview(files);
    } else {
        println!();
        println!(
            "{}",
            "No preview loaded yet - press 'p' to list files.".dimmed()
        );
    }
    Ok(())
}

fn step_review(session: &mut WizardSession<'_>) -> Result<()> {
    let provider = session.provider()?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Setting", "Value"]);

    for (name, value) in session.values() {
        let secret = provider.field(name).is_some_and(|f| f.credential);
        table.add_row(vec![name.clone(), display_value(value, secret)]);
    }
    println!("{table}");
    println!();

    if session.connection_verified() {
        println!("  {} connection verified", "OK".green().bold());
    } else {
        println!(
            "  {} connection not verified - press 't' to test it",
            "!".yellow().bold()
        );
    }
    if let Some(files) = session.files_preview() {
        println!("  {} {} file(s) in preview", "OK".green().bold(), files.len());
    }
    Ok(())
}

fn prompt_action(session: &WizardSession<'_>) -> Result<Action> {
    let mut options: Vec<(&str, &str)> = Vec::new();
    match session.step() {
        Step::SelectProvider => {
            options.push(("n", "next"));
        }
        Step::ConfigureConnection => {
            options.push(("n", "next"));
            options.push(("t", "test connection"));
        }
        Step::Preview => {
            options.push(("n", "next"));
            options.push(("p", "load preview"));
            options.push(("t", "test connection"));
        }
        Step::Review => {
            options.push(("s", "save"));
            options.push(("t", "test connection"));
        }
    }
    if session.position() > 0 {
        options.push(("b", "back"));
    }
    options.push(("e", "edit fields"));
    options.push(("q", "quit"));

    loop {
        println!();
        let legend: Vec<String> = options
            .iter()
            .map(|(key, label)| format!("[{}] {}", key.cyan(), label))
            .collect();
        print!("{} ", legend.join("  "));
        io::stdout().flush()?;

        let input = read_line()?.to_lowercase();
        let action = match input.as_str() {
            "n" | "" if session.step() != Step::Review => Some(Action::Next),
            "s" | "" if session.step() == Step::Review => Some(Action::Save),
            "b" if session.position() > 0 => Some(Action::Back),
            "e" => Some(Action::Edit),
            "t" if session.step() != Step::SelectProvider => Some(Action::Test),
            "p" if session.step() == Step::Preview => Some(Action::Preview),
            "q" | "quit" => Some(Action::Quit),
            _ => None,
        };
        match action {
            Some(action) => return Ok(action),
            None => println!("{}", "Unrecognized choice.".dimmed()),
        }
    }
}

fn prompt_field(session: &mut WizardSession<'_>, field: &FieldDef) -> Result<()> {
    let current = session.value(&field.name).cloned().unwrap_or(Value::Null);
    let shown = display_value(&current, field.credential);

    let hint = match field.kind {
        FieldKind::Toggle => " [y/n]".to_string(),
        FieldKind::Counter | FieldKind::Number => field
            .bounds
            .map(|b| format!(" [{}-{}]", b.min, b.max))
            .unwrap_or_default(),
        _ => field
            .placeholder
            .as_ref()
            .map(|p| format!(" (e.g. {p})"))
            .unwrap_or_default(),
    };
    let required = if field.required { " *" } else { "" };
    print!(
        "  {}{}{} [{}]: ",
        field.label.bold(),
        required.red(),
        hint.dimmed(),
        shown.dimmed()
    );
    io::stdout().flush()?;

    let input = if field.kind.is_secret() {
        read_secret()?
    } else {
        read_line()?
    };
    if input.is_empty() {
        return Ok(());
    }

    let value = match field.kind {
        FieldKind::Toggle => Value::Bool(matches!(input.as_str(), "y" | "yes" | "true")),
        FieldKind::Number | FieldKind::Counter => match input.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => {
                println!("{}", "Not a number, keeping previous value.".yellow());
                return Ok(());
            }
        },
        FieldKind::Select => {
            let matched = field.options.as_ref().and_then(|opts| {
                opts.iter()
                    .find(|o| o.label.eq_ignore_ascii_case(&input) || o.value == Value::from(input.clone()))
                    .map(|o| o.value.clone())
            });
            match matched {
                Some(v) => v,
                None => Value::from(input),
            }
        }
        _ => Value::from(input),
    };

    session.set_field(&field.name, value);
    if !session.validate_field(&field.name)? {
        if let Some(message) = session.errors().get(&field.name) {
            println!("    {} {}", "!".red().bold(), message.red());
        }
    }
    Ok(())
}

async fn test_connection(
    session: &mut WizardSession<'_>,
    gateway: &dyn ApiGateway,
) -> Result<()> {
    println!();
    print!("{}", "Testing connection... ".dimmed());
    io::stdout().flush()?;

    match session.test_connection(gateway).await {
        Ok(true) => println!("{}", "Success!".green().bold()),
        Ok(false) => println!("{}", "Failed - check your settings.".red()),
        Err(WizardError::Validation) => {
            println!("{}", "Blocked.".yellow());
            print_errors(session);
        }
        Err(e) => {
            println!("{}", "Failed.".red());
            println!("  {}", e.to_string().dimmed());
        }
    }
    Ok(())
}

async fn load_preview(session: &mut WizardSession<'_>, gateway: &dyn ApiGateway) -> Result<()> {
    println!();
    print!("{}", "Listing files... ".dimmed());
    io::stdout().flush()?;

    match session.load_files_preview(gateway).await {
        Ok(true) => {
            println!("{}", "done.".green());
            if let Some(files) = session.files_preview() {
                print_preview(files);
            }
        }
        Ok(false) => println!("{}", "Failed - check your settings.".red()),
        Err(WizardError::PreviewLoaded) => {
            println!(
                "{}",
                "already loaded - change a connection field to refresh.".yellow()
            );
        }
        Err(WizardError::Validation) => {
            println!("{}", "Blocked.".yellow());
            print_errors(session);
        }
        Err(e) => {
            println!("{}", "Failed.".red());
            println!("  {}", e.to_string().dimmed());
        }
    }
    Ok(())
}

async fn submit(session: &mut WizardSession<'_>, gateway: &dyn ApiGateway) -> Result<bool> {
    println!();
    print!("{}", "Saving storage... ".dimmed());
    io::stdout().flush()?;

    match session.create_or_update(gateway).await {
        Ok(true) => {
            println!("{}", "Storage saved!".green().bold());
            println!();
            Ok(true)
        }
        Ok(false) => {
            println!("{}", "The platform rejected the configuration.".red());
            Ok(false)
        }
        Err(WizardError::Validation) => {
            println!("{}", "Blocked.".yellow());
            print_errors(session);
            Ok(false)
        }
        Err(e) => Err(CommandError::Core(e)),
    }
}

fn print_errors(session: &WizardSession<'_>) {
    for (field, message) in session.errors() {
        println!("  {} {}", field.yellow(), message.red());
    }
}

fn print_preview(files: &[tether_core::RemoteFile]) {
    println!();
    if files.is_empty() {
        println!("{}", "The bucket matched no files.".dimmed());
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Size"]);
    for file in files {
        let size = file
            .size
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![file.key.clone(), size]);
    }
    println!("{table}");
}

fn display_value(value: &Value, secret: bool) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) if secret && !s.is_empty() && s != CREDENTIAL_PLACEHOLDER => {
            "********".to_string()
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn read_secret() -> Result<String> {
    // Hidden input, with a plain read fallback for non-TTY stdin
    match rpassword::read_password() {
        Ok(password) => Ok(password.trim().to_string()),
        Err(_) => read_line(),
    }
}
