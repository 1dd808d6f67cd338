use std::env;

use tracing::{debug, info};

use crate::{
    branch::BranchResolver,
    cli::{OutputMode, RunConfig},
    config::RawCfg,
    deps,
    error::{Error, Result},
    fmt::Comment,
    git::GitRepo,
    project,
    prompt::EditorPrompt,
    select::CommitSelector,
};

/// Executes the whole pipeline: dependency checks, project metadata, branch
/// resolution, commit selection, comment assembly, output.
pub fn run(cfg: &RunConfig) -> Result<()> {
    let collaborators = deps::check(cfg.output)?;

    let cwd = env::current_dir().map_err(|_| Error::CurrentDir)?;
    let root = project::locate(&cwd)?;
    let file_cfg = RawCfg::load(&root)?;

    let mut metadata = project::read_metadata(&root, &*collaborators.xml)?;
    if let Some(repository) = file_cfg.cnote.repository {
        debug!("using the configured repository URL {repository}");
        metadata.scm_url = Some(repository);
    }

    let repo = GitRepo::at(&root);
    let author = repo.user_identity()?;
    let interactive = cfg.output == OutputMode::Clipboard;
    let branch = BranchResolver::new(&repo).resolve(interactive)?;
    info!("reporting on {branch} as {author}");

    let prompt = EditorPrompt::from_env(file_cfg.cnote.editor.as_deref());
    let selector = CommitSelector::new(&repo, &author, &branch);
    let commits = selector.select(&cfg.criteria, &prompt)?;

    let comment = Comment::new(&metadata, &branch, commits);
    let text = comment.render()?;
    collaborators.sink.emit(&text)?;
    if cfg.output == OutputMode::Clipboard {
        info!(
            "comment for {} commit(s) copied to the clipboard",
            comment.entries.len()
        );
    }
    Ok(())
}
