mod candidates;
mod overrides;
