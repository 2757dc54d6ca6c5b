mod config_loading;
mod end_to_end;
