pub const BAR_WIDTH: usize = 40;
pub const FEED_LINES_SHOWN: usize = 10;
pub const PROMPT: &str = "ycsa> ";

pub const HELP_TEXT: &str = "\
Commands:
  url <video url or id>    set the video to analyze
  analyze [url]            fetch and classify the video's comments
  start [url]              start monitoring the video's live chat
  pause                    pause live chat monitoring
  list                     show or hide the per-sentiment comment listings
  export                   write charts and a JSON summary to the output directory
  help                     show this help
  quit                     exit";
