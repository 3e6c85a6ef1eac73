//! Business logic for the to-do dashboard. Everything in here talks to the outside world
//! exclusively through the driven ports declared in each submodule.

pub mod dashboard;
pub mod session;
pub mod task_form;
pub mod todo;

#[cfg(test)]
pub mod test_util;
