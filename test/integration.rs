// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{has_git, HomeFixture, RepoFixture};

use anyhow::Result;
use dotstrap::{
    command::has_command,
    link::{LinePrompter, OperatorReply, ScriptedReplies},
    setup_environment, LinkDecision, LinkReconciler, Profile, ProgressFetcher, SetupError,
};
use pretty_assertions::assert_eq;
use std::{
    fs::{create_dir_all, read_link, read_to_string, write},
    io::Cursor,
};

#[test]
fn existing_destination_declined_keeps_file() -> Result<()> {
    let fixture = HomeFixture::with_entries(&[".bashrc", ".vimrc"])?;
    write(fixture.home.join(".vimrc"), "mine")?;
    let mut reconciler = LinkReconciler::new(ScriptedReplies::new([OperatorReply::No]));

    let report = reconciler.reconcile([".bashrc", ".vimrc"], &fixture.dotfiles, &fixture.home)?;

    assert_eq!(report.decisions(), vec![LinkDecision::Create, LinkDecision::Skip]);
    assert_eq!(read_link(fixture.home.join(".bashrc"))?, fixture.dotfiles.join(".bashrc"));
    assert_eq!(read_to_string(fixture.home.join(".vimrc"))?, "mine");

    Ok(())
}

#[tokio::test]
async fn bash_profile_links_fresh_home() -> Result<()> {
    let fixture = HomeFixture::with_entries(&[".bashrc", ".bash_profile", ".bash_aliases"])?;
    let mut ctx = fixture.context(fixture.settings(), ScriptedReplies::default());

    setup_environment(Profile::Bash, &mut ctx).await?;

    for entry in [".bashrc", ".bash_profile", ".bash_aliases"] {
        assert_eq!(read_link(fixture.home.join(entry))?, fixture.dotfiles.join(entry));
    }
    assert!(ctx.decisions.asked().is_empty());

    Ok(())
}

#[tokio::test]
async fn misc_profile_yes_to_all_overwrites_rest() -> Result<()> {
    let fixture = HomeFixture::with_entries(&[".tmux.conf", ".gitconfig", ".inputrc"])?;
    write(fixture.home.join(".tmux.conf"), "mine")?;
    write(fixture.home.join(".gitconfig"), "mine")?;
    let replies = ScriptedReplies::new([OperatorReply::YesToAll]);
    let mut ctx = fixture.context(fixture.settings(), replies);

    setup_environment(Profile::Misc, &mut ctx).await?;

    for entry in [".tmux.conf", ".gitconfig", ".inputrc"] {
        assert_eq!(read_link(fixture.home.join(entry))?, fixture.dotfiles.join(entry));
    }
    assert_eq!(ctx.decisions.asked().len(), 1);

    Ok(())
}

#[tokio::test]
async fn missing_managed_entry_aborts_profile() -> Result<()> {
    let fixture = HomeFixture::with_entries(&[".bashrc", ".bash_aliases"])?;
    let mut ctx = fixture.context(fixture.settings(), ScriptedReplies::default());

    let result = setup_environment(Profile::Bash, &mut ctx).await;

    assert!(matches!(result, Err(SetupError::Link(_))));
    assert!(fixture.home.join(".bashrc").symlink_metadata().is_ok());
    assert!(fixture.home.join(".bash_aliases").symlink_metadata().is_err());

    Ok(())
}

#[test]
fn piped_replies_drive_reconciliation() -> Result<()> {
    let fixture = HomeFixture::with_entries(&[".bashrc", ".vimrc", ".inputrc"])?;
    write(fixture.home.join(".bashrc"), "mine")?;
    write(fixture.home.join(".vimrc"), "mine")?;
    write(fixture.home.join(".inputrc"), "mine")?;
    let prompter = LinePrompter::new(Cursor::new("y\nbogus\n"), Vec::new());
    let mut reconciler = LinkReconciler::new(prompter);

    let report = reconciler.reconcile(
        [".bashrc", ".vimrc", ".inputrc"],
        &fixture.dotfiles,
        &fixture.home,
    )?;

    // Third conflict finds piped input exhausted.
    assert_eq!(
        report.decisions(),
        vec![LinkDecision::Overwrite, LinkDecision::Skip, LinkDecision::Skip]
    );
    assert_eq!(read_link(fixture.home.join(".bashrc"))?, fixture.dotfiles.join(".bashrc"));
    assert_eq!(read_to_string(fixture.home.join(".vimrc"))?, "mine");
    assert_eq!(read_to_string(fixture.home.join(".inputrc"))?, "mine");

    let (_, written) = reconciler.into_inner().into_inner();
    assert_eq!(String::from_utf8(written)?.matches("[y/n/ya/na]").count(), 3);

    Ok(())
}

#[tokio::test]
async fn extra_profile_requires_installer_script() -> Result<()> {
    let fixture = HomeFixture::with_entries(&[])?;
    let mut ctx = fixture.context(fixture.settings(), ScriptedReplies::default());

    let result = setup_environment(Profile::Extra, &mut ctx).await;

    if has_command("python3") {
        assert!(
            matches!(result, Err(SetupError::MissingSource { path }) if path.ends_with("scripts/boost_install.py"))
        );
    } else {
        assert!(matches!(result, Err(SetupError::MissingCapability(cmd)) if cmd == "python3"));
    }

    Ok(())
}

#[tokio::test]
async fn runtime_profile_runs_downloaded_installer() -> Result<()> {
    let fixture = HomeFixture::with_entries(&[])?;
    let marker = fixture.home.join("installer-ran");
    let script = fixture.home.join("install.sh");
    write(&script, format!("echo done > '{}'\n", marker.display()))?;
    let mut settings = fixture.settings();
    settings.runtime.installer_url = format!("file://{}", script.display());
    let mut ctx = fixture.context(settings, ScriptedReplies::default());

    let result = setup_environment(Profile::Runtime, &mut ctx).await;

    if !has_command("curl") || !has_command("bash") {
        assert!(matches!(result, Err(SetupError::MissingCapability(_))));
        return Ok(());
    }

    result?;
    assert_eq!(read_to_string(&marker)?, "done\n");

    Ok(())
}

#[tokio::test]
async fn zsh_profile_installs_framework_then_links() -> Result<()> {
    if !has_git() {
        return Ok(());
    }

    let fixture = HomeFixture::with_entries(&[".zshrc"])?;
    let remote = RepoFixture::new(fixture.home.with_file_name("oh-my-zsh-remote"))?;
    remote.stage_and_commit("oh-my-zsh.sh", "# framework\n")?;
    let mut settings = fixture.settings();
    settings.remote.oh_my_zsh = remote.path().to_string_lossy().into_owned();
    let mut ctx = fixture.context(settings, ScriptedReplies::default());

    let result = setup_environment(Profile::Zsh, &mut ctx).await;

    if !has_command("zsh") {
        assert!(matches!(result, Err(SetupError::MissingCapability(cmd)) if cmd == "zsh"));
        assert!(!fixture.home.join(".oh-my-zsh").exists());
        return Ok(());
    }

    result?;
    assert_eq!(
        read_to_string(fixture.home.join(".oh-my-zsh/oh-my-zsh.sh"))?,
        "# framework\n"
    );
    assert_eq!(read_link(fixture.home.join(".zshrc"))?, fixture.dotfiles.join(".zshrc"));

    Ok(())
}

#[tokio::test]
async fn vim_profile_fetches_declared_plugins() -> Result<()> {
    if !has_git() {
        return Ok(());
    }

    let fixture = HomeFixture::with_entries(&[".vimrc"])?;
    write(
        fixture.dotfiles.join(".vimrc"),
        "call vundle#begin()\nPlugin 'VundleVim/Vundle.vim'\nPlugin 'tpope/vim-fugitive'\ncall vundle#end()\n",
    )?;

    let host = fixture.home.with_file_name("plugin-host");
    let plugin = RepoFixture::new(host.join("tpope/vim-fugitive.git"))?;
    plugin.stage_and_commit("plugin/fugitive.vim", "\" fugitive\n")?;

    // Vundle is already checked out, so nothing gets fetched for it.
    let vundle = fixture.home.join(".vim/bundle/Vundle.vim");
    create_dir_all(&vundle)?;
    write(vundle.join("marker"), "kept")?;

    let mut settings = fixture.settings();
    settings.remote.plugin_host = host.to_string_lossy().into_owned();
    settings.remote.vundle = host.join("no-such-vundle").to_string_lossy().into_owned();
    let mut ctx = fixture.context(settings, ScriptedReplies::default());

    setup_environment(Profile::Vim, &mut ctx).await?;

    assert_eq!(read_link(fixture.home.join(".vimrc"))?, fixture.dotfiles.join(".vimrc"));
    assert_eq!(read_to_string(vundle.join("marker"))?, "kept");
    assert_eq!(
        read_to_string(fixture.home.join(".vim/bundle/vim-fugitive/plugin/fugitive.vim"))?,
        "\" fugitive\n"
    );
    for dir in [".vim/backup", ".vim/swap", ".vim/undo"] {
        assert!(fixture.home.join(dir).is_dir(), "{dir} missing");
    }

    Ok(())
}

#[tokio::test]
async fn fetch_clones_local_repository() -> Result<()> {
    if !has_git() {
        return Ok(());
    }

    let scratch = tempfile::tempdir()?;
    let remote = RepoFixture::new(scratch.path().join("remote"))?;
    remote.stage_and_commit(".bashrc", "# remote bashrc\n")?;
    let destination = scratch.path().join("clone");

    let outcome = ProgressFetcher::new()
        .hidden()
        .fetch(&remote.path().to_string_lossy(), Some(destination.as_path()))
        .await;

    assert!(outcome.is_success(), "{outcome}");
    assert_eq!(read_to_string(destination.join(".bashrc"))?, "# remote bashrc\n");

    Ok(())
}

#[tokio::test]
async fn fetch_reports_failing_clone() -> Result<()> {
    if !has_git() {
        return Ok(());
    }

    let scratch = tempfile::tempdir()?;
    let outcome = ProgressFetcher::new()
        .hidden()
        .fetch(
            &scratch.path().join("no-such-repo").to_string_lossy(),
            Some(scratch.path().join("clone").as_path()),
        )
        .await;

    assert!(!outcome.is_success());
    assert!(outcome.message().is_some());

    Ok(())
}

#[tokio::test]
async fn absent_dotfiles_are_cloned_before_linking() -> Result<()> {
    if !has_git() {
        return Ok(());
    }

    let scratch = tempfile::tempdir()?;
    let remote = RepoFixture::new(scratch.path().join("remote"))?;
    remote.stage_and_commit(".tmux.conf", "set -g mouse on\n")?;
    remote.stage_and_commit(".gitconfig", "[user]\n")?;
    remote.stage_and_commit(".inputrc", "set editing-mode vi\n")?;

    let fixture = HomeFixture::without_dotfiles()?;
    let mut settings = fixture.settings();
    settings.remote.dotfiles = Some(remote.path().to_string_lossy().into_owned());
    let mut ctx = fixture.context(settings, ScriptedReplies::default());

    setup_environment(Profile::Misc, &mut ctx).await?;

    assert!(fixture.dotfiles.join(".git").exists());
    assert_eq!(
        read_to_string(fixture.home.join(".inputrc"))?,
        "set editing-mode vi\n"
    );

    Ok(())
}
