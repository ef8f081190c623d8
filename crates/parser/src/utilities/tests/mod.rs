mod cp437;
mod reader;
