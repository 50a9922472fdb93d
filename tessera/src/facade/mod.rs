mod view;

pub use view::ViewFacade;
