//! Terminal rendition of the estimate wizard.

use anyhow::{bail, Result};
use dialoguer::{Input, Select};
use roofer_core::{Channel, ClientIdentifier};
use roofer_wizard::{
    stories_label, Advance, ConfigLoader, ContactLinks, DotState, Field, SelectionGroup, WizardContext,
    WizardError, WizardStep, AGE_MAX, DURATION_LABELS, STORIES_MAX, STORIES_MIN,
};

use super::{command_logger, WizardArgs};
use crate::assets::FsAssetFetcher;
use crate::context::Context;

/// Option tokens and labels for each selection group.
fn options(group: SelectionGroup) -> &'static [(&'static str, &'static str)] {
    match group {
        SelectionGroup::Relation => &[
            ("owner", "I own the property"),
            ("renter", "I rent the property"),
            ("manager", "I manage the property"),
        ],
        SelectionGroup::Type => &[
            ("shingle", "Asphalt shingle"),
            ("metal", "Metal"),
            ("tile", "Tile"),
            ("flat", "Flat"),
        ],
        SelectionGroup::Size => &[
            ("small", "Small (under 1,500 sq ft)"),
            ("medium", "Medium (1,500 to 3,000 sq ft)"),
            ("large", "Large (over 3,000 sq ft)"),
        ],
        SelectionGroup::Situation => &[
            ("leak", "Active leak"),
            ("storm", "Storm damage"),
            ("aging", "Old or worn roof"),
            ("inspection", "Inspection only"),
        ],
    }
}

fn channel_label(channel: Channel) -> &'static str {
    match channel {
        Channel::Messaging => "WhatsApp",
        Channel::Sms => "Text message",
        Channel::Email => "Email",
    }
}

/// Step indicator row, one glyph per step.
fn dots(indicators: [DotState; 4]) -> String {
    indicators
        .iter()
        .map(|d| match d {
            DotState::Active => "●",
            DotState::Completed => "✓",
            DotState::Pending => "○",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the wizard command.
pub async fn run(args: WizardArgs, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("The wizard is interactive and has no JSON output");
    }

    let host = args
        .host
        .clone()
        .or_else(|| ctx.config.preview.host.clone())
        .unwrap_or_else(|| "localhost".to_string());
    let identifier = ClientIdentifier::for_page(&host, args.client.as_deref());

    let mut wizard = WizardContext::with_built_in();
    let assets = FsAssetFetcher::new(ctx.site_root()).with_configs_dir(ctx.configs_dir());
    let loader = ConfigLoader::new(assets, command_logger(ctx, "wizard"));

    let spinner = ctx.output.spinner(&format!("Loading config for {}", identifier));
    let loaded = loader.load(&identifier).await;
    spinner.finish_and_clear();
    wizard.apply_config(loaded.config);

    ctx.output.header(wizard.config().company_name());
    ctx.output.kv("identifier", identifier.as_str());
    ctx.output.kv("config", loaded.source.as_str());

    loop {
        let step = wizard.step();
        ctx.output.header(&format!(
            "Step {} of {}: {}",
            step.number(),
            WizardStep::ALL.len(),
            step.display_name()
        ));
        ctx.output.progress_line(wizard.progress_percent(), &dots(wizard.indicators()));

        prompt_step(&mut wizard, step)?;

        if step.prev().is_some() {
            let action = Select::new()
                .with_prompt("Next")
                .items(&["Continue", "Back"])
                .default(0)
                .interact()?;
            if action == 1 {
                wizard.back();
                continue;
            }
        }

        match wizard.next() {
            Ok(Advance::Moved(next)) => ctx.output.debug(&format!("Moved to {}", next.as_str())),
            Ok(Advance::Completed(links)) => {
                show_links(ctx, &wizard, &links);
                return Ok(());
            }
            Err(WizardError::StepIncomplete(rejection)) => ctx.output.warn(&rejection.to_string()),
            Err(WizardError::AlreadyComplete) => return Ok(()),
        }
    }
}

fn prompt_step(wizard: &mut WizardContext, step: WizardStep) -> Result<()> {
    match step {
        WizardStep::Property => {
            let zipcode: String = Input::new()
                .with_prompt(Field::Zipcode.display_name())
                .with_initial_text(wizard.state().value(Field::Zipcode))
                .allow_empty(true)
                .interact_text()?;
            wizard.state_mut().set_zipcode(zipcode.trim());
            prompt_selection(wizard, SelectionGroup::Relation)?;
        }
        WizardStep::Roof => {
            prompt_selection(wizard, SelectionGroup::Type)?;

            let age: u8 = Input::new()
                .with_prompt(format!("{} in years (0-{})", Field::Age.display_name(), AGE_MAX))
                .default(0)
                .validate_with(|years: &u8| {
                    if *years <= AGE_MAX {
                        Ok(())
                    } else {
                        Err(format!("enter 0 to {}", AGE_MAX))
                    }
                })
                .interact_text()?;
            wizard.state_mut().set_age(age);

            let stories: Vec<String> = (STORIES_MIN..=STORIES_MAX).map(stories_label).collect();
            let picked = Select::new()
                .with_prompt(Field::Stories.display_name())
                .items(&stories)
                .default(0)
                .interact()?;
            wizard.state_mut().set_stories(STORIES_MIN + picked as u8);

            prompt_selection(wizard, SelectionGroup::Size)?;
        }
        WizardStep::Situation => {
            prompt_selection(wizard, SelectionGroup::Situation)?;

            let picked = Select::new()
                .with_prompt(Field::Duration.display_name())
                .items(&DURATION_LABELS)
                .default(0)
                .interact()?;
            wizard.state_mut().set_duration(picked as u8);
        }
        WizardStep::Contact => {}
    }
    Ok(())
}

fn prompt_selection(wizard: &mut WizardContext, group: SelectionGroup) -> Result<()> {
    let choices = options(group);
    let labels: Vec<&str> = choices.iter().map(|(_, label)| *label).collect();
    let current = choices
        .iter()
        .position(|(value, _)| wizard.state().is_selected(group, value))
        .unwrap_or(0);

    let picked = Select::new()
        .with_prompt(group.field().display_name())
        .items(&labels)
        .default(current)
        .interact()?;
    wizard.state_mut().select(group, choices[picked].0);
    Ok(())
}

fn show_links(ctx: &Context, wizard: &WizardContext, links: &ContactLinks) {
    ctx.output
        .header(&format!("Contact {}", wizard.config().company_name()));
    ctx.output.progress_line(wizard.progress_percent(), &dots(wizard.indicators()));
    for line in links.message().lines() {
        ctx.output.kv("message", line);
    }

    let visible = links.visible();
    if visible.is_empty() {
        ctx.output.warn("This client has no contact channels configured");
        return;
    }
    for (channel, link) in visible {
        ctx.output.kv(channel_label(channel), link);
    }
    ctx.output.success("Estimate request ready to send");
}
