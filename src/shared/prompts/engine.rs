//! Template engine for vision prompts (Jinja2 syntax).
//!
//! Templates ship embedded in the binary; files under `templates/prompts/`
//! with the same name override them at startup.

use minijinja::Environment;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Override directory relative to the working directory
const TEMPLATE_DIR: &str = "templates/prompts";

/// Templates compiled into the binary, keyed by path under `templates/prompts/`
const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    (
        "vision/refine_location.jinja",
        include_str!("../../../templates/prompts/vision/refine_location.jinja"),
    ),
    (
        "vision/classify_site.jinja",
        include_str!("../../../templates/prompts/vision/classify_site.jinja"),
    ),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in EMBEDDED_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::error!("Embedded template {} is invalid: {}", name, e);
        }
    }

    let override_dir = Path::new(TEMPLATE_DIR);
    if override_dir.exists() {
        load_overrides(&mut env, override_dir, override_dir);
    }

    env
}

fn load_overrides(env: &mut Environment<'static>, base: &Path, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            load_overrides(env, base, &path);
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "jinja") {
            continue;
        }
        let (Ok(relative), Ok(content)) = (path.strip_prefix(base), std::fs::read_to_string(&path))
        else {
            continue;
        };

        let name = relative.to_string_lossy().replace('\\', "/");
        // Templates live for the whole process
        let name: &'static str = Box::leak(name.into_boxed_str());
        let content: &'static str = Box::leak(content.into_boxed_str());
        match env.add_template(name, content) {
            Ok(()) => tracing::debug!("Loaded template override: {}", name),
            Err(e) => tracing::warn!("Failed to load template {}: {}", name, e),
        }
    }
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template by its path under `templates/prompts/`
pub fn render_template<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}
