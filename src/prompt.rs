//! Turns the selected catalog options into the instruction text sent to the
//! image model. The model always receives English labels, whatever language
//! the catalog is displayed in.

use crate::models::{
    catalog::{
        english_label, CATEGORY_AGE, CATEGORY_GENDER, CATEGORY_NATIONALITY, CATEGORY_POSE,
        CATEGORY_SHOT_TYPE, CONTROL_GROUPS, GROUP_CHARACTER, GROUP_ENVIRONMENT,
        GROUP_PHOTOGRAPHY, GROUP_STYLE,
    },
    Mode, PromptOptions,
};

pub const QUALITY_ENHANCERS: &str =
    "8k, UHD, hyper-detailed, photorealistic, professional photography, sharp focus, high quality.";

pub const IMAGE_ONLY_DIRECTIVE: &str =
    "Your response MUST be the edited image ONLY. Do not output any text.";

pub const PRESERVE_IDENTITY_FALLBACK: &str = "Slightly enhance the quality and realism of this portrait. CRUCIAL: Preserve the person's identity, likeness, and all existing features with the highest fidelity. Do not make any creative changes. Your response MUST be the edited image ONLY. Do not output any text.";

const DEFAULT_SUBJECT: &str = "a person";
const DEFAULT_SHOT_TYPE: &str = "portrait";

/// One resolved selection, e.g. `Hairstyle: pixie cut`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection {
    category_id: &'static str,
    text: String,
}

/// Resolved selections of one control group, in catalog order.
#[derive(Debug, Clone)]
struct GroupSelections {
    group_id: &'static str,
    group_name: &'static str,
    entries: Vec<Selection>,
}

impl GroupSelections {
    fn texts_excluding(&self, excluded: &[&str]) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !excluded.contains(&e.category_id))
            .map(|e| e.text.as_str())
            .collect()
    }
}

pub fn build_prompt(mode: Mode, options: &PromptOptions) -> String {
    let groups = resolve_selections(options);
    let supplementary = options.supplementary.trim();
    match mode {
        Mode::ImageToImage => edit_prompt(&groups, supplementary),
        Mode::TextToImage => generation_prompt(&groups, options, supplementary),
    }
}

fn resolve_selections(options: &PromptOptions) -> Vec<GroupSelections> {
    CONTROL_GROUPS
        .iter()
        .map(|group| GroupSelections {
            group_id: group.id,
            group_name: group.name.en,
            entries: group
                .controls
                .iter()
                .filter_map(|category| {
                    let value = options.get(category.id)?;
                    let label = english_label(category.id, value)?;
                    Some(Selection {
                        category_id: category.id,
                        text: format!("{}: {}", category.name.en, label),
                    })
                })
                .collect(),
        })
        .collect()
}

fn edit_prompt(groups: &[GroupSelections], supplementary: &str) -> String {
    let mut changes = groups
        .iter()
        .filter(|g| !g.entries.is_empty())
        .map(|g| {
            let lines: Vec<String> = g.entries.iter().map(|e| format!("- {}", e.text)).collect();
            format!("**{} Changes:**\n{}", g.group_name, lines.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    if !supplementary.is_empty() {
        if !changes.is_empty() {
            changes.push_str("\n\n");
        }
        changes.push_str(&format!("**Additional Instructions:**\n- {}", supplementary));
    }

    if changes.is_empty() {
        return PRESERVE_IDENTITY_FALLBACK.to_string();
    }

    format!(
        "Meticulously edit the provided portrait. CRUCIAL: Preserve the person's fundamental identity, likeness, and facial structure with the highest possible fidelity. Apply ONLY the following changes:\n\n{}\n\nAll other details must remain identical. {}",
        changes, IMAGE_ONLY_DIRECTIVE
    )
}

fn generation_prompt(
    groups: &[GroupSelections],
    options: &PromptOptions,
    supplementary: &str,
) -> String {
    let label = |category: &str| options.get(category).and_then(|v| english_label(category, v));

    let subject_parts: Vec<&str> = [CATEGORY_AGE, CATEGORY_GENDER, CATEGORY_NATIONALITY]
        .iter()
        .filter_map(|c| label(*c))
        .collect();
    let subject = if subject_parts.is_empty() {
        DEFAULT_SUBJECT.to_string()
    } else {
        subject_parts.join(" ")
    };
    let shot_type = label(CATEGORY_SHOT_TYPE).unwrap_or(DEFAULT_SHOT_TYPE);

    let mut narrative = format!(
        "Create a single, ultra-realistic, masterpiece {} of {}.",
        shot_type, subject
    );
    if let Some(pose) = label(CATEGORY_POSE) {
        narrative.push_str(&format!(" The subject is in a \"{}\" pose.", pose));
    }

    let group = |id: &str| groups.iter().find(|g| g.group_id == id);
    let texts = |id: &str, excluded: &[&str]| -> Vec<String> {
        group(id)
            .map(|g| {
                g.texts_excluding(excluded)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut scene = texts(
        GROUP_CHARACTER,
        &[CATEGORY_AGE, CATEGORY_GENDER, CATEGORY_NATIONALITY],
    );
    scene.extend(texts(GROUP_ENVIRONMENT, &[]));
    if !scene.is_empty() {
        narrative.push_str(&format!(
            "\n\n**Scene & Subject Details:** {}.",
            scene.join("; ")
        ));
    }

    if !supplementary.is_empty() {
        narrative.push_str(&format!("\n\n**Additional Details:** {}.", supplementary));
    }

    let style = texts(GROUP_STYLE, &[CATEGORY_SHOT_TYPE]);
    if !style.is_empty() {
        narrative.push_str(&format!("\n\n**Artistic Style:** {}.", style.join("; ")));
    }

    let photography = texts(GROUP_PHOTOGRAPHY, &[CATEGORY_POSE]);
    if !photography.is_empty() {
        narrative.push_str(&format!(
            "\n\n**Photography Settings (EXIF Data):**\n- {}.",
            photography.join("\n- ")
        ));
    }

    narrative.push_str(&format!("\n\n**Final Quality:** {}", QUALITY_ENHANCERS));

    collapse_whitespace(&narrative)
}

/// Replaces every run of two or more whitespace characters with one space
/// and trims. Single whitespace characters, newlines included, are kept.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            run.push(ch);
            continue;
        }
        flush_run(&mut out, &mut run);
        out.push(ch);
    }
    flush_run(&mut out, &mut run);
    out.trim().to_string()
}

fn flush_run(out: &mut String, run: &mut String) {
    match run.chars().count() {
        0 => {}
        1 => out.push_str(run),
        _ => out.push(' '),
    }
    run.clear();
}
