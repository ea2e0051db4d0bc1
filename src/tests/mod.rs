pub(crate) mod drop_tracker;
