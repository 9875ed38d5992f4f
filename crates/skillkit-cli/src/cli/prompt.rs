//! Interactive agent selection.

use std::io::{self, BufRead, Write};

use skillkit::agents::Agent;

/// Asks the user which agents to target.
pub trait AgentPrompt {
    /// Returns the chosen agents; an empty answer keeps `preselected`.
    fn select_agents(&mut self, preselected: &[Agent]) -> io::Result<Vec<Agent>>;
}

/// Numbered menu on a line-oriented reader and writer.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> AgentPrompt for LinePrompt<R, W> {
    fn select_agents(&mut self, preselected: &[Agent]) -> io::Result<Vec<Agent>> {
        let agents = Agent::all();
        loop {
            writeln!(self.output, "Select the agents to install skills for:")?;
            for (index, agent) in agents.iter().enumerate() {
                let mark = if preselected.contains(agent) { "x" } else { " " };
                writeln!(
                    self.output,
                    "  [{mark}] {}. {} ({})",
                    index + 1,
                    agent.display_name(),
                    agent.flag()
                )?;
            }
            write!(self.output, "Numbers or flags, comma separated: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(preselected.to_vec());
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(preselected.to_vec());
            }

            match parse_selection(answer, &agents) {
                Some(selected) => return Ok(selected),
                None => writeln!(self.output, "Unrecognised selection '{answer}'.")?,
            }
        }
    }
}

fn parse_selection(answer: &str, agents: &[Agent]) -> Option<Vec<Agent>> {
    let mut selected = Vec::new();
    for token in answer.split([',', ' ']).filter(|token| !token.is_empty()) {
        let agent = match token.parse::<usize>() {
            Ok(number) => *agents.get(number.checked_sub(1)?)?,
            Err(_) => Agent::from_flag(token).ok()?,
        };
        if !selected.contains(&agent) {
            selected.push(agent);
        }
    }
    (!selected.is_empty()).then_some(selected)
}
