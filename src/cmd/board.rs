//! Workflow board commands — `ados stages`, `ados board`, `ados move`, `ados detail`.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use console::style;

use ados::config::AdosConfig;
use ados::ui::{render_board, render_notification, render_task_detail, spinner};
use ados::workflow::{
    BoardState, DetailLoader, DragCoordinator, DropOutcome, DropTarget, NotificationLog,
    SharedBoard, Stage, TransactionOutcome, WebhookClient, WorkflowBackend,
};

fn backend(config: &AdosConfig) -> Result<Arc<dyn WorkflowBackend>> {
    let client = WebhookClient::new(config.webhooks(), config.timeout())
        .context("Failed to build webhook client")?;
    Ok(Arc::new(client))
}

/// Fetch the account's board. `Ok(None)` when no account is selected.
async fn load_board(
    backend: &dyn WorkflowBackend,
    account: Option<&str>,
) -> Result<Option<SharedBoard>> {
    let board = SharedBoard::default();
    let bar = spinner("Loading workflow board...");
    let loaded = board.load(backend, account).await;
    bar.finish_and_clear();
    match loaded? {
        Some(_) => Ok(Some(board)),
        None => Ok(None),
    }
}

pub fn cmd_stages() -> Result<()> {
    for stage in Stage::ALL {
        println!("{}. {}", stage.position() + 1, stage);
    }
    Ok(())
}

pub async fn cmd_board(config: &AdosConfig, account: Option<&str>) -> Result<()> {
    let account = config.account(account);
    let backend = backend(config)?;

    let loaded = load_board(backend.as_ref(), account.as_deref()).await;
    match loaded {
        Ok(Some(board)) => {
            print!("{}", board.read(|state| render_board(state, None)));
            Ok(())
        }
        Ok(None) => {
            print!("{}", render_board(&BoardState::new(), None));
            Ok(())
        }
        Err(e) => {
            // The account is selected; it just has nothing loaded.
            let account = account.unwrap_or_default();
            println!(
                "{}",
                style(format!("Could not load the board for {}.", account)).red()
            );
            print!("{}", render_board(&BoardState::with_tasks(account, Vec::new()), None));
            Err(e)
        }
    }
}

pub async fn cmd_move(
    config: &AdosConfig,
    account: Option<&str>,
    task_id: i64,
    target: &str,
) -> Result<()> {
    let account = config.account(account);
    let backend = backend(config)?;
    let Some(board) = load_board(backend.as_ref(), account.as_deref()).await? else {
        bail!("No account selected. Pass --account or set board.default_account.");
    };

    let notifications = Arc::new(NotificationLog::new());
    let coordinator = DragCoordinator::new(board, backend, notifications.clone());

    coordinator.pick_up(task_id)?;
    let target = DropTarget::from_droppable_id(target);
    let outcome = match coordinator.release(target)? {
        DropOutcome::Cancelled { .. } => {
            println!("{}", style("Not a column or task on this board; nothing changed.").dim());
            return Ok(());
        }
        DropOutcome::Unchanged { stage, .. } => {
            println!("{}", style(format!("Task {} is already in {}.", task_id, stage)).dim());
            return Ok(());
        }
        DropOutcome::Committing(tx) => {
            let bar = spinner(format!("Moving task {} to {}...", task_id, tx.target()));
            let outcome = tx.confirm().await;
            bar.finish_and_clear();
            outcome
        }
    };

    for notification in notifications.entries() {
        println!("{}", render_notification(&notification));
    }
    println!();
    print!("{}", coordinator.board().read(|state| render_board(state, None)));

    match outcome {
        TransactionOutcome::Confirmed { .. } => Ok(()),
        TransactionOutcome::RolledBack { error, .. } => {
            Err(anyhow::Error::new(error)
                .context(format!("Move of task {} was rolled back", task_id)))
        }
    }
}

pub async fn cmd_detail(config: &AdosConfig, account: Option<&str>, task_id: i64) -> Result<()> {
    let account = config.account(account);
    let backend = backend(config)?;

    // Task fields are optional decoration; the overlay still renders without them.
    let task = match load_board(backend.as_ref(), account.as_deref()).await {
        Ok(Some(board)) => board.task(task_id),
        Ok(None) | Err(_) => None,
    };

    let loader = DetailLoader::new(backend);
    let bar = spinner("Loading ad blocks...");
    let groups = loader.load(task_id).await;
    bar.finish_and_clear();

    print!("{}", render_task_detail(task.as_ref(), &groups));
    Ok(())
}
