//! When steps for ordered task list scenarios.

use super::world::{OrderingWorld, run_async};
use rstest_bdd_macros::when;
use todo_diaries::task::services::EditTaskRequest;

fn create(world: &mut OrderingWorld, name: String, pinned: bool) {
    let result = run_async(world.engine.create_active_task(name.clone(), pinned));
    if let Ok(id) = &result {
        world.tasks.insert(name, *id);
    }
    world.last_result = Some(result);
}

#[when(r#"the owner creates the pinned task "{name}""#)]
fn create_pinned(world: &mut OrderingWorld, name: String) {
    create(world, name, true);
}

#[when(r#"the owner creates the unpinned task "{name}""#)]
fn create_unpinned(world: &mut OrderingWorld, name: String) {
    create(world, name, false);
}

#[when("the owner creates an unpinned task of {length:usize} characters")]
fn create_with_length(world: &mut OrderingWorld, length: usize) {
    create(world, "x".repeat(length), false);
}

#[when(r#"the owner toggles the pin on "{name}""#)]
fn toggle_pin(world: &mut OrderingWorld, name: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&name)?;
    world.last_result = Some(run_async(world.engine.toggle_pin(id)));
    Ok(())
}

#[when(r#"the owner achieves "{name}""#)]
fn achieve(world: &mut OrderingWorld, name: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&name)?;
    world.last_result = Some(run_async(world.engine.achieve_now(id)));
    Ok(())
}

#[when(r#"the owner un-achieves "{name}""#)]
fn unachieve(world: &mut OrderingWorld, name: String) -> Result<(), eyre::Report> {
    let id = world.task_id(&name)?;
    world.last_result = Some(run_async(world.engine.unachieve(id)));
    Ok(())
}

#[when(r#"the owner renames "{old_name}" to "{new_name}""#)]
fn rename(world: &mut OrderingWorld, old_name: String, new_name: String) -> Result<(), eyre::Report> {
    let current = world.task(&old_name)?;
    let pinned = current.pinned().unwrap_or(false);
    let achieved = current.achieved_at().is_some();
    let request = EditTaskRequest::new(current.id(), new_name.clone(), pinned, achieved);
    let result = run_async(world.engine.apply_edit(request));
    if result.is_ok() {
        world.tasks.insert(new_name, current.id());
    }
    world.last_result = Some(result);
    Ok(())
}
