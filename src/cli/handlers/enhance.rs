use crate::cli::commands::EnhanceArgs;
use crate::cli::output::EnhanceJson;
use crate::io::enhance::{EnhanceClient, EnhanceRequest};
use crate::io::schedule_file;
use crate::model::DirectorConfig;

/// Build the request the same way the editor dialog does: context from a
/// schedule file when given, else the single `--previous` prompt.
pub fn build_request(
    args: &EnhanceArgs,
    config: &DirectorConfig,
) -> Result<EnhanceRequest, Box<dyn std::error::Error>> {
    if let (Some(path), Some(frame)) = (&args.schedule, args.frame) {
        let schedule = schedule_file::read_schedule(path, config.timeline.max_frames)?;
        return Ok(EnhanceRequest::for_frame(&args.prompt, &schedule, frame));
    }
    let mut request = EnhanceRequest::new(&args.prompt);
    request.previous_prompt = args
        .previous
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    Ok(request)
}

pub fn cmd_enhance(
    args: EnhanceArgs,
    config: &DirectorConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = build_request(&args, config)?;
    let client = EnhanceClient::new(&config.enhance);
    log::info!("enhancing via {}", client.url());
    let prompt = request.prompt.clone();
    let enhanced = client.enhance(request)?;
    if json {
        let out = EnhanceJson {
            prompt,
            enhanced_prompt: enhanced,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", enhanced);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{Cli, Commands};
    use clap::Parser;
    use tempfile::TempDir;

    fn args(argv: &[&str]) -> EnhanceArgs {
        match Cli::parse_from(argv).command {
            Some(Commands::Enhance(a)) => a,
            _ => panic!("expected enhance"),
        }
    }

    #[test]
    fn previous_flag_sets_previous_prompt() {
        let a = args(&["director", "enhance", "  a dragon  ", "--previous", "temple"]);
        let req = build_request(&a, &DirectorConfig::default()).unwrap();
        assert_eq!(req.prompt, "a dragon");
        assert_eq!(req.previous_prompt.as_deref(), Some("temple"));
        assert!(req.previous_prompts.is_empty());
    }

    #[test]
    fn schedule_context_stops_before_frame() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("show.toml");
        std::fs::write(
            &path,
            "[[prompt]]\nframe = 0\ntext = \"temple\"\n\n[[prompt]]\nframe = 60\ntext = \"dragon\"\n\n[[prompt]]\nframe = 120\ntext = \"knights\"\n",
        )
        .unwrap();
        let a = args(&[
            "director",
            "enhance",
            "storm",
            "--schedule",
            path.to_str().unwrap(),
            "--frame",
            "90",
        ]);
        let req = build_request(&a, &DirectorConfig::default()).unwrap();
        assert_eq!(req.previous_prompt.as_deref(), Some("dragon"));
        let frames: Vec<u32> = req.previous_prompts.iter().map(|p| p.frame).collect();
        assert_eq!(frames, vec![0, 60]);
    }
}
