//! Prompt construction for create, refine and convert requests.

use crate::config::ModelConfig;
use crate::request::{ChatMessage, ChatRequest};
use openui_core::ToolDefinition;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Default system prompt for UI generation.
pub const SYSTEM_PROMPT: &str = "You are an expert frontend developer who builds beautiful, modern and functional web interfaces with Tailwind CSS and vanilla JavaScript.

Guidelines:
- Responsive layouts that work on desktop, tablet and mobile
- Dark and light mode through Tailwind's dark: variants
- Semantic, accessible HTML with proper ARIA attributes
- Modern JavaScript (ES6+) using native browser APIs only
- Clear typography, consistent spacing, hover and focus states
- placehold.co for placeholder images, Heroicons or Lucide from a CDN for icons
- Robust event handling with sensible behavior on edge cases

Keep the response focused on the code. Return only the HTML that belongs inside the <body> tag, without <head> or a full document.";

/// Asks the model to open its answer with `name`/`emoji` frontmatter.
pub const FRONTMATTER_INSTRUCTIONS: &str = "\n\nAlways start your response with frontmatter wrapped in ---.  Set name: with a 2 to 5 word description of the component. Set emoji: with an emoji for the component, i.e.:
---
name: Fancy Button
emoji: 🎉
---

<button class=\"bg-blue-500 text-white p-2 rounded-lg\">Click me</button>\n\n";

/// Appended to the system prompt when tools are offered.
pub const TOOL_GUIDANCE: &str = "\n\nYou have access to tools that can help create better UI components:
- Use 'create_interactive_component' to generate complex interactive elements
- Use 'html_renderer' to preview and test HTML components
- Use 'generate_sample_data' to create realistic data for components
- Use 'javascript' to add custom logic and interactivity
- Use 'create_chart' to generate data visualizations

Consider using these tools when they make the component more functional.";

/// System prompt for framework conversion. `$FRAMEWORK` is substituted.
pub const CONVERT_SYSTEM_PROMPT: &str = "You're a frontend web developer that specializes in $FRAMEWORK.
Given html and javascript, generate a $FRAMEWORK component. Factor the code into smaller
components if necessary. Keep all code in one file. Use hooks and put tailwind class strings
that are repeated at least 3 times into a shared constant. Leave comments when necessary.";

/// User prompt used instead of the query when the HTML carries FIX annotations.
pub const FIX_PROMPT: &str = "Address the FIX comments.";

static FIX_ANNOTATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<!--FIX (\(\d+\)): (.+)-->").ok());

/// Whether `html` contains `<!--FIX (n): ...-->` annotations.
pub fn has_fix_annotations(html: &str) -> bool {
    FIX_ANNOTATION.as_ref().is_some_and(|re| re.is_match(html))
}

/// What a generation request does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Build a new component from a prompt, optionally with a screenshot.
    #[default]
    Create,
    /// Change existing HTML according to a prompt.
    Refine,
}

/// Inputs for a create or refine request.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Create a new component or refine existing HTML.
    pub action: Action,
    /// The user's prompt.
    pub query: String,
    /// Existing HTML. Its presence suppresses the frontmatter instructions.
    pub html: Option<String>,
    /// Screenshot as a data URL. Only used when creating.
    pub image: Option<String>,
    /// Replaces [`SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,
    /// Tools to offer. Empty disables tool calling.
    pub tools: Vec<ToolDefinition>,
}

/// Builds the request for a create or refine action.
pub fn build_generate_request(config: &ModelConfig, options: &GenerateOptions) -> ChatRequest {
    let tools_enabled = !options.tools.is_empty();
    let html = options.html.as_deref().filter(|h| !h.is_empty());

    let mut system = options
        .system_prompt
        .clone()
        .unwrap_or_else(|| SYSTEM_PROMPT.to_string());
    if tools_enabled {
        system.push_str(TOOL_GUIDANCE);
    }
    if html.is_none() {
        system.push_str(FRONTMATTER_INSTRUCTIONS);
    }

    let mut model = config.model_id.clone();
    let user = match options.action {
        Action::Create => match &options.image {
            Some(image) => {
                if model.starts_with("gpt") {
                    model = "gpt-4o".to_string();
                }
                let image_url = if model.starts_with("ollama/") {
                    bare_base64(image).to_string()
                } else {
                    image.clone()
                };
                let text = if tools_enabled {
                    options.query.clone()
                } else {
                    screenshot_prompt(&options.query)
                };
                ChatMessage::user_with_image(text, image_url)
            }
            None => ChatMessage::user(options.query.clone()),
        },
        Action::Refine => {
            let html = html.unwrap_or_default();
            if tools_enabled {
                ChatMessage::user(format!(
                    "Here's the current HTML:\n\n{html}\n\n{}",
                    options.query
                ))
            } else {
                let prompt = if has_fix_annotations(html) {
                    FIX_PROMPT
                } else {
                    options.query.as_str()
                };
                ChatMessage::user(format!("Given the following HTML:\n\n{html}\n\n{prompt}"))
            }
        }
    };

    debug!(
        action = ?options.action,
        model = %model,
        tools = options.tools.len(),
        image = options.image.is_some(),
        "Built generation request"
    );

    ChatRequest {
        model,
        messages: vec![ChatMessage::system(system), user],
        temperature: config.temperature,
        max_tokens: Some(config.max_tokens),
        tools: options.tools.clone(),
    }
}

/// Builds the request that converts `html` into a `framework` component.
pub fn build_convert_request(config: &ModelConfig, framework: &str, html: &str) -> ChatRequest {
    let system = CONVERT_SYSTEM_PROMPT.replace("$FRAMEWORK", framework);
    let user = format!(
        "Given the following HTML:\n\n{html}\n\nPlease turn this into a {framework} component."
    );
    ChatRequest {
        model: config.model_id.clone(),
        messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        temperature: config.temperature,
        max_tokens: None,
        tools: Vec::new(),
    }
}

fn screenshot_prompt(query: &str) -> String {
    let requirements = if query.is_empty() {
        String::new()
    } else {
        format!("The following are some special requirements: \n {query}")
    };
    format!(
        "This is a screenshot of a web component I want to replicate.  Please generate HTML for it.\n {requirements}"
    )
}

/// Strips the `data:...;base64,` prefix from a data URL.
fn bare_base64(image: &str) -> &str {
    image.rsplit(',').next().unwrap_or(image)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;
    use crate::request::{ContentPart, MessageContent};

    fn config(model: &str) -> ModelConfig {
        ModelConfig {
            provider: LlmProvider::OpenAi,
            model_id: model.into(),
            api_key: String::new(),
            api_base_url: None,
            temperature: 0.3,
            max_tokens: 8192,
        }
    }

    fn tool() -> ToolDefinition {
        ToolDefinition::new("javascript", "Executes JavaScript")
            .required("code", "string", "The JavaScript code to execute")
    }

    fn image_url(req: &ChatRequest) -> String {
        match &req.messages[1].content {
            MessageContent::Parts(parts) => match &parts[1] {
                ContentPart::ImageUrl { image_url } => image_url.url.clone(),
                ContentPart::Text { .. } => panic!("expected image part"),
            },
            MessageContent::Text(_) => panic!("expected parts"),
        }
    }

    #[test]
    fn test_create_adds_frontmatter_instructions() {
        let req = build_generate_request(
            &config("gpt-3.5-turbo"),
            &GenerateOptions {
                query: "a login form".into(),
                ..GenerateOptions::default()
            },
        );
        let system = req.messages[0].text();
        assert!(system.starts_with(SYSTEM_PROMPT));
        assert!(system.contains("name: Fancy Button"));
        assert!(!system.contains("You have access to tools"));
        assert_eq!(req.messages[1].text(), "a login form");
        assert_eq!(req.model, "gpt-3.5-turbo");
        assert_eq!(req.max_tokens, Some(8192));
        assert!(!req.has_tools());
    }

    #[test]
    fn test_refine_without_tools_detects_fix_comments() {
        let html = "<div><!--FIX (1): make the image larger--><img></div>";
        let req = build_generate_request(
            &config("gpt-4o"),
            &GenerateOptions {
                action: Action::Refine,
                query: "ignored".into(),
                html: Some(html.into()),
                ..GenerateOptions::default()
            },
        );
        assert!(!req.messages[0].text().contains("frontmatter"));
        assert_eq!(
            req.messages[1].text(),
            format!("Given the following HTML:\n\n{html}\n\nAddress the FIX comments.")
        );
    }

    #[test]
    fn test_refine_with_tools() {
        let req = build_generate_request(
            &config("gpt-4o"),
            &GenerateOptions {
                action: Action::Refine,
                query: "make it blue".into(),
                html: Some("<p>x</p>".into()),
                tools: vec![tool()],
                ..GenerateOptions::default()
            },
        );
        assert!(req.messages[0].text().contains("create_chart"));
        assert_eq!(
            req.messages[1].text(),
            "Here's the current HTML:\n\n<p>x</p>\n\nmake it blue"
        );
        assert!(req.has_tools());
    }

    #[test]
    fn test_image_switches_gpt_models_to_gpt4o() {
        let req = build_generate_request(
            &config("gpt-3.5-turbo"),
            &GenerateOptions {
                query: "dark theme".into(),
                image: Some("data:image/png;base64,QUJD".into()),
                ..GenerateOptions::default()
            },
        );
        assert_eq!(req.model, "gpt-4o");
        assert_eq!(image_url(&req), "data:image/png;base64,QUJD");
        let text = req.messages[1].text();
        assert!(text.starts_with("This is a screenshot of a web component"));
        let requirements = "The following are some special requirements: \n dark theme";
        assert!(text.ends_with(requirements));
    }

    #[test]
    fn test_image_for_ollama_is_bare_base64() {
        let req = build_generate_request(
            &config("ollama/llava"),
            &GenerateOptions {
                image: Some("data:image/png;base64,QUJD".into()),
                ..GenerateOptions::default()
            },
        );
        assert_eq!(req.model, "ollama/llava");
        assert_eq!(image_url(&req), "QUJD");
    }

    #[test]
    fn test_convert_substitutes_framework() {
        let req = build_convert_request(&config("gpt-4o"), "Svelte", "<p>x</p>");
        let system = req.messages[0].text();
        let intro = "You're a frontend web developer that specializes in Svelte.";
        assert!(system.starts_with(intro));
        assert!(!system.contains("$FRAMEWORK"));
        let user = req.messages[1].text();
        assert!(user.ends_with("Please turn this into a Svelte component."));
        assert_eq!(req.max_tokens, None);
    }
}
