mod game;
mod hit_region;
mod maze;
mod platform;
mod section;
mod sdl;
mod settings;

use game::Game;
use sdl::SdlPlatform;

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

fn main() -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let _image_context = sdl2::image::init(sdl2::image::InitFlag::PNG)?;
    let ttf_context = sdl2::ttf::init().map_err(|e| e.to_string())?;

    let _audio_subsystem = sdl_context.audio()?;
    let _mixer_context = sdl2::mixer::init(sdl2::mixer::InitFlag::OGG)?;
    sdl2::mixer::open_audio(
        44_100,
        sdl2::mixer::DEFAULT_FORMAT,
        sdl2::mixer::DEFAULT_CHANNELS,
        1_024,
    )?;

    let window = video_subsystem
        .window("Maze Crawler", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut event_pump = sdl_context.event_pump()?;

    let platform = SdlPlatform::new(&mut canvas, &texture_creator, &ttf_context, &mut event_pump);
    let mut game = match Game::new(platform) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Game: fatal load error: {}", e);
            std::process::exit(1);
        }
    };

    while !game.is_done() {
        game.handle_input();
        if let Err(e) = game.update() {
            eprintln!("Game: fatal load error: {}", e);
            std::process::exit(1);
        }
        game.clear();
        game.render()?;
        game.present();
    }

    Ok(())
}
