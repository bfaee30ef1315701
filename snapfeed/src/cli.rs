use clap::{Parser, Subcommand, ValueEnum};
use snapfeed_api::endpoints::posts::Sort;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "snapfeed", version, about = "Command-line client for the snapfeed backend")]
pub struct Cli {
    /// Config file path
    #[arg(
        short,
        long,
        env = "SNAPFEED_CONFIG",
        default_value = "config.toml",
        global = true
    )]
    pub config: String,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check whether the backend is reachable
    Health,
    /// Sign in and store the session tokens
    Login {
        email: String,
        #[arg(long, env = "SNAPFEED_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account; an OTP is emailed to confirm it
    Register {
        username: String,
        email: String,
        #[arg(long, env = "SNAPFEED_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, env = "SNAPFEED_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },
    /// Confirm a registration with the emailed OTP
    VerifyOtp { email: String, otp: String },
    /// Send the registration OTP again
    ResendOtp { email: String },
    /// Start a password reset
    ForgotPassword { email: String },
    /// Check a password reset OTP
    VerifyForgotOtp { email: String, otp: String },
    /// Set a new password with a password reset OTP
    ResetPassword {
        email: String,
        otp: String,
        #[arg(long, env = "SNAPFEED_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session and forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List posts
    Feed {
        #[arg(long, value_enum, default_value_t = SortArg::Latest)]
        sort: SortArg,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Only posts by this user
        #[arg(long)]
        user: Option<u64>,
    },
    /// Show one post
    Post { id: u64 },
    /// Publish a post, optionally with an image or video
    Create {
        content: String,
        #[arg(long)]
        media: Option<PathBuf>,
    },
    /// Delete one of your posts
    Delete { id: u64 },
    /// Like or unlike a post
    Like { id: u64 },
    /// Save or unsave a post
    Save { id: u64 },
    /// Show a profile (your own without an id)
    Profile { id: Option<u64> },
    /// Follow or unfollow a user
    Follow { id: u64 },
    /// List your saved posts
    Saved,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Latest,
    Liked,
    Trending,
}

impl From<SortArg> for Sort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Latest => Sort::Latest,
            SortArg::Liked => Sort::Liked,
            SortArg::Trending => Sort::Trending,
        }
    }
}
