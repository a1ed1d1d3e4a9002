//! Built-in agents and global variables.

use std::collections::HashMap;

use super::definition::{Agent, AgentCapabilities};
use crate::domain::foundation::AgentId;
use crate::domain::proposal::markup_instructions;

struct AgentSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    persona: &'static str,
    intro: &'static str,
    capabilities: AgentCapabilities,
}

const SEEDS: &[AgentSeed] = &[
    AgentSeed {
        id: "editor",
        name: "Editor",
        description: "Helps improve writing clarity and structure",
        persona: "You are an expert editor focusing on academic writing. Help users improve their writing clarity, structure, and academic style.",
        intro: "Hello! I'm your Editor Assistant. I can help you improve your writing, check for clarity, and suggest structural improvements. How can I assist you today?",
        capabilities: AgentCapabilities {
            web_search: false,
            code_execution: false,
            file_access: true,
        },
    },
    AgentSeed {
        id: "reviewer",
        name: "Reviewer",
        description: "Provides peer review feedback",
        persona: "You are an academic peer reviewer. Evaluate documents based on scientific merit, methodology, and contribution to the field.",
        intro: "Greetings! I'm your Peer Review Assistant. I'll help evaluate your work using standard academic peer review criteria. What would you like me to review?",
        capabilities: AgentCapabilities {
            web_search: true,
            code_execution: false,
            file_access: true,
        },
    },
    AgentSeed {
        id: "researcher",
        name: "Researcher",
        description: "Assists with research and citations",
        persona: "You are a research assistant specializing in literature review and citation management. Help users find relevant sources and maintain proper citations.",
        intro: "Welcome! I'm your Research Assistant. I can help you find relevant literature, manage citations, and strengthen your research. What area would you like to explore?",
        capabilities: AgentCapabilities {
            web_search: true,
            code_execution: false,
            file_access: true,
        },
    },
    AgentSeed {
        id: "bidara",
        name: "BIDARA",
        description: "Bio-Inspired Design and Research Assistant",
        persona: "You are BIDARA, a biomimetic designer and research assistant, and a leading expert in biomimicry, biology, engineering, industrial design, environmental science, physiology, and paleontology. You were instructed by NASA's PeTaL project to understand, learn from, and emulate the strategies used by living things to help users create sustainable designs and technologies.\n\nYour goal is to help the user work in a step by step way through the Biomimicry Design Process to propose biomimetic solutions to a challenge. Cite peer reviewed sources for your information. Stop often (at a minimum after every step) to ask the user for feedback or clarification.",
        intro: "Hello! I'm BIDARA, your Bio-Inspired Design and Research Assistant. I can help you explore nature's strategies and apply them to your design challenges. Would you like to start with the Biomimicry Design Process?",
        capabilities: AgentCapabilities {
            web_search: true,
            code_execution: false,
            file_access: true,
        },
    },
];

/// Agents available out of the box. Each instruction ends with the
/// change-proposal markup rules.
pub fn default_agents() -> Vec<Agent> {
    let rules = markup_instructions();
    SEEDS
        .iter()
        .filter_map(|seed| {
            let id = AgentId::new(seed.id).ok()?;
            Some(
                Agent::new(
                    id,
                    seed.name,
                    format!("{}\n\n{}", seed.persona, rules),
                    seed.intro,
                )
                .with_description(seed.description)
                .with_capabilities(seed.capabilities),
            )
        })
        .collect()
}

/// Global variables available to every agent template.
pub fn default_global_variables() -> HashMap<String, String> {
    HashMap::from([
        ("user-name".to_string(), "User".to_string()),
        (
            "current-date".to_string(),
            chrono::Local::now().format("%Y-%m-%d").to_string(),
        ),
        ("project-name".to_string(), "Scientific Document".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::proposal::PROPOSAL_TAG;

    #[test]
    fn ships_four_agents_with_unique_ids() {
        let agents = default_agents();
        let ids: Vec<&str> = agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["editor", "reviewer", "researcher", "bidara"]);
    }

    #[test]
    fn every_agent_describes_the_markup() {
        for agent in default_agents() {
            assert!(
                agent.system_instruction.contains(PROPOSAL_TAG),
                "{} lacks markup rules",
                agent.name
            );
            assert!(!agent.intro_message.is_empty());
        }
    }

    #[test]
    fn global_variables_include_current_date() {
        let vars = default_global_variables();
        assert_eq!(vars.get("user-name").map(String::as_str), Some("User"));
        assert_eq!(vars.get("current-date").map(String::len), Some(10));
    }
}
