mod fps;
mod scheduler;

pub use fps::FpsCounter;
pub use scheduler::FrameScheduler;
