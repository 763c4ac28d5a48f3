//! Surprise-me prompt catalog
//!
//! A fixed set of example prompts offered by the "surprise me" affordance,
//! plus the picker that guarantees the suggestion actually changes.

use rand::Rng;

/// Prompts offered by the "surprise me" button. Compiled into the binary,
/// never mutated at runtime.
pub const SURPRISE_PROMPTS: [&str; 46] = [
    "an armchair in the shape of an avocado",
    "a surrealist dream-like oil painting by Salvador Dal\u{ed} of a cat playing checkers",
    "teddy bears shopping for groceries in Japan, ukiyo-e",
    "an oil painting by Matisse of a humanoid robot playing chess",
    "panda mad scientist mixing sparkling chemicals, digital art",
    "a macro 35mm photograph of two mice in Hawaii, they're each wearing tiny swimsuits and are carrying tiny surf boards, digital art",
    "3D render of a cute tropical fish in an aquarium on a dark blue background, digital art",
    "an astronaut lounging in a tropical resort in space, vaporwave",
    "an oil painting portrait of a capybara wearing medieval royal robes and an ornate crown on a dark background",
    "a stained glass window depicting a hamburger and french fries",
    "a pencil and watercolor drawing of a bright city in the future with flying cars",
    "a sunlit indoor lounge area with a pool with clear water and another pool with translucent pastel pink water, next to a big window, digital art",
    "a fortune-telling shiba inu reading your fate in a giant hamburger, digital art",
    "\"a sea otter with a pearl earring\" by Johannes Vermeer",
    "an oil pastel drawing of an annoyed cat in a spaceship",
    "a painting of a fox in the style of Starry Night",
    "a bowl of soup that looks like a monster, knitted out of wool",
    "a plush toy robot sitting against a yellow wall",
    "a synthwave style sunset above the reflecting water of the sea, digital art",
    "two futuristic towers with a skybridge covered in lush foliage, digital art",
    "a 3D render of a rainbow colored hot air balloon flying above a reflective lake",
    "a comic book cover of a superhero wearing headphones",
    "a centered explosion of colorful powder on a black background",
    "a photo of a Samoyed dog with its tongue out hugging a white Siamese cat",
    "a photo of a white fur monster standing in a purple room",
    "a photo of Michelangelo's sculpture of David wearing headphones djing",
    "a Samurai riding a Horse on Mars, lomography",
    "a modern, sleek Cadillac drives along the Gardiner expressway with downtown Toronto in the background, with a lens flare, 50mm photography",
    "a realistic photograph of a young woman with blue eyes and blonde hair",
    "a man standing in front of a stargate to another dimension",
    "Spongebob Squarepants in the Blair Witch Project",
    "a velociraptor working at a hotdog stand, lomography",
    "a man walking through the bustling streets of Kowloon at night, lit by many bright neon shop signs, 50mm lens",
    "a BBQ that is alive, in the style of a Pixar animated movie, 3D render, digital art",
    "a futuristic cyborg dance club, neon lights",
    "the long-lost Star Wars 1990 Japanese Anime",
    "a hamburger in the shape of a Rubik's cube, professional food photography",
    "a Synthwave Hedgehog, Blade Runner Cyberpunk",
    "an astronaut encountering an alien life form on a distant planet, photography",
    "a Dinosaur exploring Cape Town, photography",
    "a Man falling in Love with his Computer, digital art",
    "a photograph of a sunflower with sunglasses on in the middle of the flower in a field on a bright sunny day",
    "a photo of a teddy bear on a skateboard in Times Square",
    "a tornado made of sharks crashing into a skyscraper, painting in the style of Hokusai",
    "Synthwave Buffalo",
    "a painting of a majestic royal tall ship in Age of Discovery",
];

/// Pick a catalog entry distinct from `current`.
///
/// Draw-and-reject: resample while the draw equals `current`. A single-entry
/// catalog would never terminate under that rule, so its entry is returned
/// directly. The catalog must be non-empty.
pub fn pick_distinct<'a>(catalog: &'a [&'a str], current: &str) -> &'a str {
    if catalog.len() == 1 {
        return catalog[0];
    }
    let mut rng = rand::thread_rng();
    loop {
        let candidate = catalog[rng.gen_range(0..catalog.len())];
        if candidate != current {
            return candidate;
        }
    }
}

/// Pick a surprise prompt distinct from the current draft prompt.
pub fn surprise_prompt(current: &str) -> &'static str {
    pick_distinct(&SURPRISE_PROMPTS, current)
}
