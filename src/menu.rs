// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Interactive profile menu.
//!
//! Profiles are listed by number in [`Profile::ALL`] order, starting from one.
//! The menu keeps coming back after each selection until the operator quits.

use crate::profile::Profile;

use std::str::FromStr;

/// Selection made from menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Set up environment of profile.
    Setup(Profile),

    /// Leave menu.
    Quit,
}

impl FromStr for MenuChoice {
    type Err = MenuError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let data = data.trim();
        if matches!(data, "q" | "quit") {
            return Ok(Self::Quit);
        }

        data.parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| Profile::ALL.get(index).copied())
            .map(Self::Setup)
            .ok_or_else(|| MenuError::InvalidChoice(data.into()))
    }
}

/// Render menu listing.
pub fn render() -> String {
    let entries: String = Profile::ALL
        .iter()
        .enumerate()
        .map(|(index, profile)| {
            format!(
                "  {}) {:<8} {}\n",
                index + 1,
                profile.name(),
                profile.summary()
            )
        })
        .collect();

    format!("Select an environment to set up:\n{entries}  q) quit")
}

/// Menu error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    /// Input does not name a menu entry.
    #[error("invalid choice {0:?}, pick a number from 1 to {max} or q to quit", max = Profile::ALL.len())]
    InvalidChoice(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use simple_test_case::test_case;

    #[test_case("1", MenuChoice::Setup(Profile::Bash); "first")]
    #[test_case("3", MenuChoice::Setup(Profile::Vim); "middle")]
    #[test_case(" 6\n", MenuChoice::Setup(Profile::Extra); "last with whitespace")]
    #[test_case("q", MenuChoice::Quit; "short quit")]
    #[test_case("quit", MenuChoice::Quit; "long quit")]
    #[test]
    fn parse_valid_choice(input: &str, expect: MenuChoice) {
        assert_eq!(input.parse::<MenuChoice>(), Ok(expect));
    }

    #[test_case("0"; "zero")]
    #[test_case("7"; "past end")]
    #[test_case("bash"; "profile name")]
    #[test_case(""; "empty")]
    #[test_case("Q"; "uppercase quit")]
    #[test]
    fn parse_invalid_choice(input: &str) {
        assert!(matches!(
            input.parse::<MenuChoice>(),
            Err(MenuError::InvalidChoice(_))
        ));
    }

    #[test]
    fn render_lists_every_profile() {
        let expect = indoc! {"
            Select an environment to set up:
              1) bash     bash startup files
              2) zsh      zsh with oh-my-zsh
              3) vim      vim with Vundle plugins
              4) misc     tmux, git, and readline configuration
              5) runtime  language version manager
              6) extra    boost libraries from source
              q) quit"};
        assert_eq!(render(), expect);
    }
}
