use anyhow::Result;
use notecal_core::settings::Settings;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = Settings::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            println!("{}", e.to_string().red());
            return Ok(());
        }
    };

    println!("{}", "Settings".bold());
    println!("  Calendar:   {}", or_unset(&settings.calendar_id));
    println!(
        "  Token:      {}",
        if settings.access_token.trim().is_empty() { "not set" } else { "set" }
    );
    println!("  Timezone:   {}", settings.timezone);
    println!("  Format:     {}", settings.path_format().unwrap_or("(daily-notes settings)"));
    println!("  Max events: {}", settings.max_events);
    println!("  Timed:      {}", settings.templates.normal_event);
    println!("  All day:    {}", settings.templates.all_day_event);
    println!();

    match settings.validate() {
        Ok(()) => println!("{}", "Settings are valid".green()),
        Err(e) => println!("{}", e.to_string().red()),
    }

    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() { "(not set)" } else { value }
}
